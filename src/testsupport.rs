//! Shared test fixtures for the orchestration test modules.
//!
//! The mock backend records calls and arguments so workflow tests can
//! assert on preconditions (no remote call), threading (quality tier,
//! seed images), and poll-loop behavior without any network.

use crate::api::{GenerationBackend, QualityTier, ThemeData, VideoOperation, VideoRequest};
use crate::error::ApiError;
use crate::keygate::KeyGate;
use crate::theme::{ColorPatch, IconStyle};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// A deterministic theme-data payload used across workflow tests.
pub fn sample_theme_data() -> ThemeData {
    ThemeData {
        name: "Neon Dusk".into(),
        description: "Electric purples over charcoal.".into(),
        colors: ColorPatch {
            primary: Some("#a855f7".into()),
            background: Some("#111111".into()),
            ..ColorPatch::default()
        },
        wallpaper_prompt: "neon dusk skyline, purple haze".into(),
        icon_style: Some(IconStyle::Outline),
    }
}

/// Scriptable [`GenerationBackend`] with call recording.
pub struct MockBackend {
    /// Theme-data payload handed out once; absent means a mock failure.
    pub theme_data: Mutex<Option<ThemeData>>,
    /// When set, every remote call fails with this message.
    fail_with: Option<String>,
    /// Number of polls before the video operation reports done.
    polls_until_done: u32,
    /// When present, image generation blocks until [`Self::release_image`].
    image_barrier: Option<Arc<Notify>>,

    pub theme_count: AtomicU32,
    pub image_count: AtomicU32,
    pub edit_count: AtomicU32,
    pub start_count: AtomicU32,
    pub poll_count: AtomicU32,
    pub download_count: AtomicU32,

    pub last_image_prompt: Mutex<Option<String>>,
    pub last_quality: Mutex<Option<QualityTier>>,
    pub last_edit: Mutex<Option<(String, String)>>,
    /// Prompt and whether the request carried a seed image.
    pub last_video_request: Mutex<Option<(String, bool)>>,
}

impl MockBackend {
    /// Data URI returned by successful image calls.
    pub const IMAGE_URI: &'static str = "data:image/png;base64,WA==";
    /// Download URI reported by finished video operations.
    pub const VIDEO_URI: &'static str = "https://files.example/video.mp4";

    /// Fail every remote call with the given message.
    pub fn failing_with(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// Report the video operation done after `n` polls (0 = done at start).
    pub fn done_after_polls(mut self, n: u32) -> Self {
        self.polls_until_done = n;
        self
    }

    /// Block image generation until [`Self::release_image`] is called.
    pub fn with_image_barrier(mut self) -> Self {
        self.image_barrier = Some(Arc::new(Notify::new()));
        self
    }

    /// Unblock a pending (or future) image generation call.
    pub fn release_image(&self) {
        if let Some(barrier) = &self.image_barrier {
            barrier.notify_one();
        }
    }

    fn fail_if_scripted(&self) -> Result<(), ApiError> {
        match &self.fail_with {
            Some(message) => Err(ApiError::InvalidResponse(message.clone())),
            None => Ok(()),
        }
    }

    fn operation(&self, done: bool) -> VideoOperation {
        VideoOperation {
            name: "operations/mock".into(),
            done,
            video_uri: done.then(|| Self::VIDEO_URI.to_string()),
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            theme_data: Mutex::new(None),
            fail_with: None,
            polls_until_done: 0,
            image_barrier: None,
            theme_count: AtomicU32::new(0),
            image_count: AtomicU32::new(0),
            edit_count: AtomicU32::new(0),
            start_count: AtomicU32::new(0),
            poll_count: AtomicU32::new(0),
            download_count: AtomicU32::new(0),
            last_image_prompt: Mutex::new(None),
            last_quality: Mutex::new(None),
            last_edit: Mutex::new(None),
            last_video_request: Mutex::new(None),
        }
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate_theme_data(&self, _prompt: &str) -> Result<ThemeData, ApiError> {
        self.theme_count.fetch_add(1, Ordering::SeqCst);
        self.fail_if_scripted()?;
        self.theme_data
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| ApiError::InvalidResponse("mock: no theme data scripted".into()))
    }

    async fn generate_image(
        &self,
        prompt: &str,
        quality: QualityTier,
    ) -> Result<String, ApiError> {
        self.image_count.fetch_add(1, Ordering::SeqCst);
        *self.last_image_prompt.lock().unwrap() = Some(prompt.to_string());
        *self.last_quality.lock().unwrap() = Some(quality);
        if let Some(barrier) = &self.image_barrier {
            barrier.notified().await;
        }
        self.fail_if_scripted()?;
        Ok(Self::IMAGE_URI.to_string())
    }

    async fn edit_image(&self, image: &str, instruction: &str) -> Result<String, ApiError> {
        self.edit_count.fetch_add(1, Ordering::SeqCst);
        *self.last_edit.lock().unwrap() = Some((image.to_string(), instruction.to_string()));
        self.fail_if_scripted()?;
        Ok(Self::IMAGE_URI.to_string())
    }

    async fn start_video(&self, request: &VideoRequest) -> Result<VideoOperation, ApiError> {
        self.start_count.fetch_add(1, Ordering::SeqCst);
        *self.last_video_request.lock().unwrap() =
            Some((request.prompt.clone(), request.seed_image.is_some()));
        self.fail_if_scripted()?;
        Ok(self.operation(self.polls_until_done == 0))
    }

    async fn poll_video(&self, _operation: &VideoOperation) -> Result<VideoOperation, ApiError> {
        let polls = self.poll_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.fail_if_scripted()?;
        Ok(self.operation(polls >= self.polls_until_done))
    }

    async fn download_video(&self, _uri: &str) -> Result<Vec<u8>, ApiError> {
        self.download_count.fetch_add(1, Ordering::SeqCst);
        self.fail_if_scripted()?;
        Ok(b"mock-video-bytes".to_vec())
    }
}

/// [`KeyGate`] that records selection prompts.
pub struct RecordingGate {
    has_key: bool,
    pub prompted: AtomicU32,
}

impl RecordingGate {
    pub fn with_key() -> Self {
        Self {
            has_key: true,
            prompted: AtomicU32::new(0),
        }
    }

    pub fn without_key() -> Self {
        Self {
            has_key: false,
            prompted: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl KeyGate for RecordingGate {
    async fn has_selected_key(&self) -> Result<bool, String> {
        Ok(self.has_key)
    }

    async fn open_select_key(&self) {
        self.prompted.fetch_add(1, Ordering::SeqCst);
    }
}
