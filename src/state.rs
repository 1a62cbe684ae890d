//! Session state: the single live [`Theme`] plus generation status flags.
//!
//! Workflows never hold the state lock across an await, so when two
//! workflows complete close together the later merge wins field-by-field.
//! That last-write-wins semantic is intentional; lost updates here are
//! cosmetic, and serializing completions would change observable behavior.

use crate::theme::{default_theme, Theme, ThemePatch};
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// Workflows and status flags
// ---------------------------------------------------------------------------

/// The five asynchronous generation workflows, each bound to one in-flight
/// flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    SynthesizeTheme,
    SynthesizeWallpaper,
    SynthesizeLiveWallpaper,
    EditWallpaper,
    AnimateImage,
}

/// Ephemeral per-session generation status.
///
/// The flags are independent: the host may trigger any workflow while
/// another is in flight. Only the most recent error is retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStatus {
    pub generating_theme: bool,
    pub generating_wallpaper: bool,
    pub generating_live_wallpaper: bool,
    pub editing_image: bool,
    pub animating_image: bool,
    pub error: Option<String>,
}

impl GenerationStatus {
    /// True when any workflow is in flight.
    pub fn is_working(&self) -> bool {
        self.generating_theme
            || self.generating_wallpaper
            || self.generating_live_wallpaper
            || self.editing_image
            || self.animating_image
    }

    fn flag_mut(&mut self, workflow: Workflow) -> &mut bool {
        match workflow {
            Workflow::SynthesizeTheme => &mut self.generating_theme,
            Workflow::SynthesizeWallpaper => &mut self.generating_wallpaper,
            Workflow::SynthesizeLiveWallpaper => &mut self.generating_live_wallpaper,
            Workflow::EditWallpaper => &mut self.editing_image,
            Workflow::AnimateImage => &mut self.animating_image,
        }
    }

    /// Read one workflow's in-flight flag.
    pub fn flag(&self, workflow: Workflow) -> bool {
        match workflow {
            Workflow::SynthesizeTheme => self.generating_theme,
            Workflow::SynthesizeWallpaper => self.generating_wallpaper,
            Workflow::SynthesizeLiveWallpaper => self.generating_live_wallpaper,
            Workflow::EditWallpaper => self.editing_image,
            Workflow::AnimateImage => self.animating_image,
        }
    }
}

// ---------------------------------------------------------------------------
// ThemeState
// ---------------------------------------------------------------------------

/// The single owner of the live theme and its generation status.
#[derive(Debug)]
pub struct ThemeState {
    theme: Theme,
    status: GenerationStatus,
}

impl ThemeState {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            status: GenerationStatus::default(),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn status(&self) -> &GenerationStatus {
        &self.status
    }

    /// Merge a partial update into the theme (nested merge for colors).
    pub fn apply(&mut self, patch: ThemePatch) {
        self.theme.merge(patch);
    }

    /// Replace the whole theme (import path; id comes from the document).
    pub fn replace(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Start a workflow: clear the error slot and raise the flag.
    pub fn begin(&mut self, workflow: Workflow) {
        self.status.error = None;
        *self.status.flag_mut(workflow) = true;
    }

    /// End a workflow, success or failure: lower the flag.
    pub fn finish(&mut self, workflow: Workflow) {
        *self.status.flag_mut(workflow) = false;
    }

    /// Record a user-visible error, overwriting any previous one.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status.error = Some(message.into());
    }
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new(default_theme())
    }
}

// ---------------------------------------------------------------------------
// Shared handle
// ---------------------------------------------------------------------------

/// Cloneable handle to the session state.
///
/// Each method takes the lock for one synchronous mutation or snapshot and
/// releases it before returning, so no await point ever holds it.
#[derive(Debug, Clone, Default)]
pub struct SharedThemeState {
    inner: Arc<Mutex<ThemeState>>,
}

impl SharedThemeState {
    pub fn new(theme: Theme) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ThemeState::new(theme))),
        }
    }

    /// Snapshot of the current theme.
    pub fn theme(&self) -> Theme {
        self.lock().theme.clone()
    }

    /// Snapshot of the current generation status.
    pub fn status(&self) -> GenerationStatus {
        self.lock().status.clone()
    }

    pub fn apply(&self, patch: ThemePatch) {
        self.lock().apply(patch);
    }

    pub fn replace(&self, theme: Theme) {
        self.lock().replace(theme);
    }

    pub fn begin(&self, workflow: Workflow) {
        self.lock().begin(workflow);
    }

    pub fn finish(&self, workflow: Workflow) {
        self.lock().finish(workflow);
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.lock().set_error(message);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ThemeState> {
        // A poisoned lock only means a panic mid-merge; the theme data is
        // still the best state we have.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
