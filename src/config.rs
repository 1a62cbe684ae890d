//! Configuration loading.
//!
//! Precedence: explicit `--config` path, then `./themeforge.toml`, then
//! `~/.config/themeforge/themeforge.toml`. The API key may also come from
//! the `GEMINI_API_KEY` environment variable, which wins over file values.

use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Env var consulted for the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Local config file name checked in the working directory.
const LOCAL_CONFIG_FILE: &str = "themeforge.toml";

/// App directory name under the user config root.
const APP_DIR: &str = "themeforge";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_THEME_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
const DEFAULT_IMAGE_MODEL_HQ: &str = "gemini-3-pro-image-preview";
const DEFAULT_VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_MAX_POLLS: u32 = 120;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub models: ModelsConfig,
    pub video: VideoConfig,
    pub assets: AssetsConfig,
}

/// Remote API connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Model ids per generation task.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub theme: String,
    pub image: String,
    pub image_hq: String,
    pub video: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME_MODEL.into(),
            image: DEFAULT_IMAGE_MODEL.into(),
            image_hq: DEFAULT_IMAGE_MODEL_HQ.into(),
            video: DEFAULT_VIDEO_MODEL.into(),
        }
    }
}

/// Video operation polling policy.
///
/// Polling is bounded: a hung video backend turns into a reported failure
/// after `max_polls` checks instead of a forever-pending flag.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub poll_interval_secs: u64,
    pub max_polls: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

/// Where downloaded wallpaper video assets are written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub dir: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        let dir = dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR)
            .join("assets");
        Self { dir }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load configuration with path precedence and env-key override.
pub fn load_config(explicit_path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match resolve_config_path(explicit_path) {
        Some(path) => parse_file(&path)?,
        None => Config::default(),
    };
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            config.api.key = key;
        }
    }
    Ok(config)
}

/// Default location of the persisted session theme file.
pub fn default_session_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
        .join("theme.json")
}

fn resolve_config_path(explicit_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    let global = dirs::config_dir()?.join(APP_DIR).join(LOCAL_CONFIG_FILE);
    if global.exists() {
        return Some(global);
    }
    None
}

fn parse_file(path: &Path) -> Result<Config, ConfigError> {
    let raw = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&raw)?;
    if config.api.timeout_secs == 0 {
        return Err(ConfigError::Invalid("api.timeout_secs must be > 0".into()));
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
