//! CLI entry point for themeforge.

mod cli;

use clap::Parser;
use std::sync::Arc;
use themeforge::api::{GeminiClient, QualityTier};
use themeforge::config::{default_session_file, load_config};
use themeforge::orchestrator::Orchestrator;
use themeforge::persist;
use themeforge::state::SharedThemeState;
use themeforge::theme::{default_theme, ColorPatch, IconStyle, Theme, ThemePatch, WallpaperMode};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = cli::Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let session_file = args.session.clone().unwrap_or_else(default_session_file);
    let theme = persist::load_session(&session_file).unwrap_or_else(default_theme);
    let state = SharedThemeState::new(theme);
    let backend = Arc::new(GeminiClient::new(&config));
    let orchestrator = Orchestrator::new(state.clone(), backend, &config);

    let mut failed = false;
    match args.command {
        cli::Command::Theme { prompt } => {
            let chain = orchestrator.synthesize_theme(&prompt).await;
            // The chain is fire-and-forget for the workflow; a one-shot CLI
            // still waits so the session file captures the wallpaper.
            if let Some(handle) = chain {
                let _ = handle.await;
            }
            failed = report(&state);
        }
        cli::Command::Wallpaper {
            high_quality,
            prompt,
        } => {
            let quality = if high_quality {
                QualityTier::High
            } else {
                QualityTier::Standard
            };
            orchestrator.synthesize_wallpaper(quality, prompt).await;
            failed = report(&state);
        }
        cli::Command::Live => {
            orchestrator.synthesize_live_wallpaper().await;
            failed = report(&state);
        }
        cli::Command::Edit { instruction } => {
            orchestrator.edit_wallpaper(&instruction).await;
            failed = report(&state);
        }
        cli::Command::Animate => {
            orchestrator.animate_image().await;
            failed = report(&state);
        }
        cli::Command::Show => print_theme(&state.theme()),
        cli::Command::Export { path } => match persist::export_theme(&state.theme(), &path) {
            Ok(()) => println!("exported theme to {}", path.display()),
            Err(e) => {
                eprintln!("error: {e}");
                failed = true;
            }
        },
        cli::Command::Import { path } => match persist::import_theme(&path) {
            Ok(theme) => {
                state.replace(theme);
                print_theme(&state.theme());
            }
            Err(e) => {
                eprintln!("error: {e}");
                failed = true;
            }
        },
        cli::Command::ImportWallpaper { path } => {
            match persist::import_wallpaper_image(&path) {
                Ok(image) => {
                    state.apply(ThemePatch {
                        wallpaper_image: Some(Some(image)),
                        active_wallpaper_mode: Some(WallpaperMode::Image),
                        ..ThemePatch::default()
                    });
                    print_theme(&state.theme());
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    failed = true;
                }
            }
        }
        cli::Command::SetColor { slot, value } => match ColorPatch::for_slot(&slot, value) {
            Some(colors) => {
                state.apply(ThemePatch {
                    colors: Some(colors),
                    ..ThemePatch::default()
                });
                print_theme(&state.theme());
            }
            None => {
                eprintln!("error: unknown color slot: {slot}");
                failed = true;
            }
        },
        cli::Command::IconStyle { style } => match style.parse::<IconStyle>() {
            Ok(style) => {
                state.apply(ThemePatch {
                    icon_style: Some(style),
                    ..ThemePatch::default()
                });
                print_theme(&state.theme());
            }
            Err(e) => {
                eprintln!("error: {e}");
                failed = true;
            }
        },
        cli::Command::Mode { mode } => match mode.parse::<WallpaperMode>() {
            Ok(mode) => {
                state.apply(ThemePatch {
                    active_wallpaper_mode: Some(mode),
                    ..ThemePatch::default()
                });
                print_theme(&state.theme());
            }
            Err(e) => {
                eprintln!("error: {e}");
                failed = true;
            }
        },
    }

    if let Err(e) = persist::save_session(&state.theme(), &session_file) {
        eprintln!("warning: failed to save session: {e}");
    }
    if failed {
        std::process::exit(1);
    }
}

/// Print the workflow outcome; returns true when it ended in an error.
fn report(state: &SharedThemeState) -> bool {
    match state.status().error {
        Some(message) => {
            eprintln!("error: {message}");
            true
        }
        None => {
            print_theme(&state.theme());
            false
        }
    }
}

fn print_theme(theme: &Theme) {
    println!("{} — {}", theme.name, theme.description);
    println!("  id:         {}", theme.id);
    let colors = &theme.colors;
    println!(
        "  colors:     primary {} | secondary {} | accent {}",
        colors.primary, colors.secondary, colors.accent
    );
    println!(
        "              background {} | surface {} | text {}",
        colors.background, colors.surface, colors.text
    );
    println!("  prompt:     {}", theme.wallpaper_prompt);
    println!(
        "  wallpaper:  {}",
        match &theme.wallpaper_image {
            Some(uri) => format!("inline image ({} chars)", uri.len()),
            None => "none".into(),
        }
    );
    println!(
        "  live:       {}",
        theme.live_wallpaper_url.as_deref().unwrap_or("none")
    );
    println!(
        "  mode:       {:?}, icons {:?}",
        theme.active_wallpaper_mode, theme.icon_style
    );
}
