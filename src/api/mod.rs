//! Remote generation capability.
//!
//! The API layer is split into cohesive modules:
//! - `wire`: serde types for the Gemini-style REST payloads
//! - `client`: reqwest transport implementing [`GenerationBackend`]

use crate::error::ApiError;
use crate::theme::{ColorPatch, IconStyle};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod client;
pub mod wire;

pub use client::GeminiClient;

/// Image model variant selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityTier {
    Standard,
    High,
}

/// Structured theme data returned by theme synthesis.
///
/// Colors arrive as a patch: the remote schema asks for all six slots, but
/// the merge treats whatever subset came back as a per-slot update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeData {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub colors: ColorPatch,
    pub wallpaper_prompt: String,
    #[serde(default)]
    pub icon_style: Option<IconStyle>,
}

/// Parameters for a video synthesis job (text or image seeded).
#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub prompt: String,
    /// Seed image as a data URI; present for image-to-video.
    pub seed_image: Option<String>,
}

/// Handle to a long-running video generation operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoOperation {
    /// Remote operation name, polled until completion.
    pub name: String,
    pub done: bool,
    /// Download URI for the finished asset; set once `done` is true.
    pub video_uri: Option<String>,
}

/// The remote generation capability as the orchestrator sees it.
///
/// This trait lets tests provide deterministic mock responses without
/// network calls while the production path uses [`GeminiClient`].
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Synthesize structured theme data from a free-text prompt.
    async fn generate_theme_data(&self, prompt: &str) -> Result<ThemeData, ApiError>;

    /// Synthesize a phone wallpaper image; returns a data URI.
    async fn generate_image(&self, prompt: &str, quality: QualityTier)
        -> Result<String, ApiError>;

    /// Edit an existing image per a free-text instruction; returns the
    /// replacement data URI.
    async fn edit_image(&self, image: &str, instruction: &str) -> Result<String, ApiError>;

    /// Start a video generation job and return its operation handle.
    async fn start_video(&self, request: &VideoRequest) -> Result<VideoOperation, ApiError>;

    /// Poll a video operation for completion.
    async fn poll_video(&self, operation: &VideoOperation) -> Result<VideoOperation, ApiError>;

    /// Fetch the finished video asset bytes.
    async fn download_video(&self, uri: &str) -> Result<Vec<u8>, ApiError>;
}
