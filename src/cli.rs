//! CLI argument parsing via clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AI phone-theme configurator for the terminal.
#[derive(Debug, Parser)]
#[command(name = "themeforge", version)]
pub struct Args {
    /// Path to config file (default: ./themeforge.toml or
    /// ~/.config/themeforge/themeforge.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Session theme file (default: ~/.config/themeforge/theme.json).
    #[arg(long = "session")]
    pub session: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Synthesize a new theme from a description, then its wallpaper.
    Theme {
        /// Free-text description of the desired aesthetic.
        prompt: String,
    },
    /// Synthesize a wallpaper image from the stored (or given) prompt.
    Wallpaper {
        /// Use the high-fidelity image model.
        #[arg(long = "high-quality")]
        high_quality: bool,
        /// Override the theme's stored wallpaper prompt.
        #[arg(long = "prompt")]
        prompt: Option<String>,
    },
    /// Synthesize a live wallpaper video from the stored prompt.
    Live,
    /// Edit the current wallpaper image.
    Edit {
        /// Free-text edit instruction.
        instruction: String,
    },
    /// Animate the current wallpaper image into a live wallpaper.
    Animate,
    /// Print the current theme.
    Show,
    /// Export the theme as a JSON document.
    Export { path: PathBuf },
    /// Import a theme JSON document.
    Import { path: PathBuf },
    /// Use a local image file as the wallpaper.
    ImportWallpaper { path: PathBuf },
    /// Set one color slot directly.
    SetColor {
        /// One of: primary, secondary, accent, background, surface, text.
        slot: String,
        /// Hex color value, e.g. "#22d3ee".
        value: String,
    },
    /// Set the icon style directly.
    IconStyle {
        /// One of: minimal, filled, outline, neumorphic.
        style: String,
    },
    /// Switch which wallpaper asset is displayed.
    Mode {
        /// "image" or "video".
        mode: String,
    },
}
