//! Themeforge — an AI phone-theme configurator core.
//!
//! A user describes a desired aesthetic; a remote generation service
//! produces a color palette, a wallpaper image, and optionally an animated
//! live wallpaper. This crate owns the session state and the asynchronous
//! workflows that drive it; rendering is left to the host front end.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use themeforge::api::GeminiClient;
//! use themeforge::config::load_config;
//! use themeforge::orchestrator::Orchestrator;
//! use themeforge::state::SharedThemeState;
//!
//! # async fn example() {
//! let config = load_config(None).unwrap();
//! let backend = Arc::new(GeminiClient::new(&config));
//! let state = SharedThemeState::default();
//! let orchestrator = Orchestrator::new(state.clone(), backend, &config);
//! orchestrator.synthesize_theme("deep ocean bioluminescence").await;
//! println!("{}", state.theme().name);
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod keygate;
pub mod orchestrator;
pub mod persist;
pub mod state;
#[cfg(test)]
pub mod testsupport;
pub mod theme;
