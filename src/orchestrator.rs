//! Generation workflows over the remote backend.
//!
//! Every workflow follows the same shape: check its precondition (failing
//! locally, without a remote call), clear the error slot and raise its
//! in-flight flag, await the backend, lower the flag, then either merge the
//! result into the theme or classify the failure into a user-visible
//! message. The flag is lowered on both paths, directly after the await.
//!
//! Workflows do not exclude each other; flags are independent and theme
//! merges stay last-write-wins per field (see [`crate::state`]).

use crate::api::{GenerationBackend, QualityTier, ThemeData, VideoRequest};
use crate::config::{Config, VideoConfig};
use crate::error::{ApiError, PersistError};
use crate::keygate::{ensure_key, AssumePresentGate, KeyGate};
use crate::persist;
use crate::state::{SharedThemeState, Workflow};
use crate::theme::{new_theme_id, ThemePatch, WallpaperMode};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Fixed message for safety-policy rejections.
const SAFETY_MESSAGE: &str = "Safety filters triggered. Try a different prompt.";
/// Fixed message for auth/not-found failures.
const KEY_MESSAGE: &str = "API error. Please check your API key selection.";
/// Fixed message when the poll cap is reached.
const VIDEO_TIMEOUT_MESSAGE: &str = "Video generation timed out. Try again.";

const NO_THEME_PROMPT: &str = "Describe the theme you want first.";
const NO_WALLPAPER_PROMPT: &str = "No wallpaper prompt available.";
const NO_VIDEO_PROMPT: &str = "No prompt available for video.";
const NO_IMAGE_TO_EDIT: &str = "No image to edit.";
const NO_IMAGE_TO_ANIMATE: &str = "No image to animate.";

const FALLBACK_THEME: &str = "Failed to generate theme.";
const FALLBACK_WALLPAPER: &str = "Wallpaper generation failed.";
const FALLBACK_LIVE: &str = "Live wallpaper generation failed.";
const FALLBACK_EDIT: &str = "Image editing failed.";
const FALLBACK_ANIMATE: &str = "Animation failed.";

// ---------------------------------------------------------------------------
// Poll policy
// ---------------------------------------------------------------------------

/// Bounded polling policy for long-running video operations.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_polls: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from(&VideoConfig::default())
    }
}

impl From<&VideoConfig> for PollPolicy {
    fn from(config: &VideoConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.poll_interval_secs),
            max_polls: config.max_polls,
        }
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Drives the five generation workflows against one [`SharedThemeState`].
pub struct Orchestrator {
    state: SharedThemeState,
    backend: Arc<dyn GenerationBackend>,
    gate: Arc<dyn KeyGate>,
    poll: PollPolicy,
    assets_dir: PathBuf,
}

enum VideoJobError {
    Api(ApiError),
    Asset(PersistError),
    TimedOut,
}

impl From<ApiError> for VideoJobError {
    fn from(e: ApiError) -> Self {
        Self::Api(e)
    }
}

impl Orchestrator {
    /// Build an orchestrator with the default (assume-present) key gate.
    pub fn new(state: SharedThemeState, backend: Arc<dyn GenerationBackend>, config: &Config) -> Arc<Self> {
        Self::with_gate(state, backend, Arc::new(AssumePresentGate), config)
    }

    /// Build an orchestrator with a host-supplied key gate.
    pub fn with_gate(
        state: SharedThemeState,
        backend: Arc<dyn GenerationBackend>,
        gate: Arc<dyn KeyGate>,
        config: &Config,
    ) -> Arc<Self> {
        Arc::new(Self {
            state,
            backend,
            gate,
            poll: PollPolicy::from(&config.video),
            assets_dir: config.assets.dir.clone(),
        })
    }

    /// Session state driven by this orchestrator.
    pub fn state(&self) -> &SharedThemeState {
        &self.state
    }

    // -- workflows ----------------------------------------------------------

    /// Synthesize a brand-new theme from a free-text prompt.
    ///
    /// On success the theme gets a fresh id, both wallpaper assets are
    /// cleared, and a standard-quality wallpaper synthesis is chained with
    /// the new prompt. The chain is fire-and-forget relative to this
    /// workflow's own flag; the returned handle lets the host await it.
    pub async fn synthesize_theme(self: &Arc<Self>, prompt: &str) -> Option<JoinHandle<()>> {
        if prompt.trim().is_empty() {
            self.state.set_error(NO_THEME_PROMPT);
            return None;
        }
        self.state.begin(Workflow::SynthesizeTheme);
        let result = self.backend.generate_theme_data(prompt).await;
        match result {
            Ok(data) => {
                let chain_prompt = data.wallpaper_prompt.clone();
                self.state.apply(new_theme_patch(data));
                debug!("theme synthesized; chaining wallpaper generation");
                let chain = if chain_prompt.is_empty() {
                    None
                } else {
                    let this = Arc::clone(self);
                    Some(tokio::spawn(async move {
                        this.synthesize_wallpaper(QualityTier::Standard, Some(chain_prompt))
                            .await;
                    }))
                };
                self.state.finish(Workflow::SynthesizeTheme);
                chain
            }
            Err(e) => {
                self.state.finish(Workflow::SynthesizeTheme);
                self.record_failure(&e, FALLBACK_THEME).await;
                None
            }
        }
    }

    /// Synthesize a wallpaper image from the override prompt or the theme's
    /// stored prompt.
    pub async fn synthesize_wallpaper(&self, quality: QualityTier, prompt_override: Option<String>) {
        let prompt = prompt_override
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| self.state.theme().wallpaper_prompt);
        if prompt.trim().is_empty() {
            self.state.set_error(NO_WALLPAPER_PROMPT);
            return;
        }
        // Advisory key check happens before the in-flight flag goes up.
        if quality == QualityTier::High {
            ensure_key(self.gate.as_ref()).await;
        }
        self.state.begin(Workflow::SynthesizeWallpaper);
        let result = self.backend.generate_image(&prompt, quality).await;
        self.state.finish(Workflow::SynthesizeWallpaper);
        match result {
            Ok(image) => self.state.apply(ThemePatch {
                wallpaper_image: Some(Some(image)),
                active_wallpaper_mode: Some(WallpaperMode::Image),
                ..ThemePatch::default()
            }),
            Err(e) => self.record_failure(&e, FALLBACK_WALLPAPER).await,
        }
    }

    /// Synthesize a live wallpaper video from the theme's stored prompt.
    pub async fn synthesize_live_wallpaper(&self) {
        let prompt = self.state.theme().wallpaper_prompt;
        if prompt.trim().is_empty() {
            self.state.set_error(NO_VIDEO_PROMPT);
            return;
        }
        ensure_key(self.gate.as_ref()).await;
        self.state.begin(Workflow::SynthesizeLiveWallpaper);
        let result = self
            .run_video_job(VideoRequest {
                prompt,
                seed_image: None,
            })
            .await;
        self.state.finish(Workflow::SynthesizeLiveWallpaper);
        match result {
            Ok(url) => self.state.apply(ThemePatch {
                live_wallpaper_url: Some(Some(url)),
                active_wallpaper_mode: Some(WallpaperMode::Video),
                ..ThemePatch::default()
            }),
            Err(e) => self.record_video_failure(e, FALLBACK_LIVE).await,
        }
    }

    /// Edit the current wallpaper image per a free-text instruction.
    pub async fn edit_wallpaper(&self, instruction: &str) {
        let Some(image) = self.state.theme().wallpaper_image else {
            self.state.set_error(NO_IMAGE_TO_EDIT);
            return;
        };
        self.state.begin(Workflow::EditWallpaper);
        let result = self.backend.edit_image(&image, instruction).await;
        self.state.finish(Workflow::EditWallpaper);
        match result {
            Ok(edited) => self.state.apply(ThemePatch {
                wallpaper_image: Some(Some(edited)),
                active_wallpaper_mode: Some(WallpaperMode::Image),
                ..ThemePatch::default()
            }),
            Err(e) => self.record_failure(&e, FALLBACK_EDIT).await,
        }
    }

    /// Animate the current wallpaper image into a live wallpaper, using the
    /// stored prompt as the motion hint.
    pub async fn animate_image(&self) {
        let theme = self.state.theme();
        let Some(image) = theme.wallpaper_image else {
            self.state.set_error(NO_IMAGE_TO_ANIMATE);
            return;
        };
        ensure_key(self.gate.as_ref()).await;
        self.state.begin(Workflow::AnimateImage);
        let result = self
            .run_video_job(VideoRequest {
                prompt: theme.wallpaper_prompt,
                seed_image: Some(image),
            })
            .await;
        self.state.finish(Workflow::AnimateImage);
        match result {
            Ok(url) => self.state.apply(ThemePatch {
                live_wallpaper_url: Some(Some(url)),
                active_wallpaper_mode: Some(WallpaperMode::Video),
                ..ThemePatch::default()
            }),
            Err(e) => self.record_video_failure(e, FALLBACK_ANIMATE).await,
        }
    }

    // -- internals ----------------------------------------------------------

    /// Start a video job, poll it to completion, then download the asset
    /// and return its local reference.
    async fn run_video_job(&self, request: VideoRequest) -> Result<String, VideoJobError> {
        let mut operation = self.backend.start_video(&request).await?;
        let mut polls: u32 = 0;
        while !operation.done {
            if polls >= self.poll.max_polls {
                warn!(name = %operation.name, polls, "video poll cap reached");
                return Err(VideoJobError::TimedOut);
            }
            sleep(self.poll.interval).await;
            operation = self.backend.poll_video(&operation).await?;
            polls += 1;
        }
        let uri = operation.video_uri.ok_or_else(|| {
            VideoJobError::Api(ApiError::InvalidResponse(
                "video generation failed: no download URI returned".into(),
            ))
        })?;
        let bytes = self.backend.download_video(&uri).await?;
        let path =
            persist::save_video_asset(&self.assets_dir, &bytes).map_err(VideoJobError::Asset)?;
        Ok(path.display().to_string())
    }

    /// Classify a remote failure into the user-visible error slot, prompting
    /// key reselection on auth-like failures.
    async fn record_failure(&self, err: &ApiError, fallback: &str) {
        let (message, reselect) = classify_failure(err, fallback);
        warn!(error = %err, "workflow failed: {message}");
        self.state.set_error(message);
        if reselect {
            self.gate.open_select_key().await;
        }
    }

    async fn record_video_failure(&self, err: VideoJobError, fallback: &str) {
        match err {
            VideoJobError::Api(e) => self.record_failure(&e, fallback).await,
            VideoJobError::Asset(e) => {
                warn!(error = %e, "video asset save failed");
                self.state.set_error(e.to_string());
            }
            VideoJobError::TimedOut => self.state.set_error(VIDEO_TIMEOUT_MESSAGE),
        }
    }
}

/// Patch applied when a brand-new theme arrives: fresh id, merged remote
/// fields, both assets cleared, display back to image mode.
fn new_theme_patch(data: ThemeData) -> ThemePatch {
    ThemePatch {
        id: Some(new_theme_id()),
        name: Some(data.name),
        description: Some(data.description),
        colors: Some(data.colors),
        wallpaper_prompt: Some(data.wallpaper_prompt),
        wallpaper_image: Some(None),
        live_wallpaper_url: Some(None),
        active_wallpaper_mode: Some(WallpaperMode::Image),
        icon_style: data.icon_style,
    }
}

/// Uniform failure classification across all workflows.
///
/// Returns the user message and whether key reselection should be prompted.
fn classify_failure(err: &ApiError, fallback: &str) -> (String, bool) {
    let detail = match err {
        ApiError::Http(e) => e.to_string(),
        ApiError::Status(_, body) => body.clone(),
        ApiError::InvalidResponse(msg) => msg.clone(),
    };
    if detail.contains("SAFETY") {
        return (SAFETY_MESSAGE.into(), false);
    }
    if err.status_code() == Some(404) || detail.contains("404") {
        return (KEY_MESSAGE.into(), true);
    }
    if detail.trim().is_empty() {
        (fallback.into(), false)
    } else {
        (detail, false)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
