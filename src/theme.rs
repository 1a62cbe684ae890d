//! Theme data model.
//!
//! These types serialize to the camelCase JSON document shape used by theme
//! export/import, so saved documents stay interchangeable with the hosted
//! configurator.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// The six named color slots of a theme.
///
/// All six keys are always present; hex strings are accepted as-is (they
/// come from the remote schema or a color-input control, neither of which
/// warrants validation here).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text: String,
}

/// Partial color update; only supplied slots change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ColorPatch {
    /// A patch updating one slot by name. Unknown slot names are rejected.
    pub fn for_slot(slot: &str, value: impl Into<String>) -> Option<Self> {
        let mut patch = Self::default();
        let value = value.into();
        match slot {
            "primary" => patch.primary = Some(value),
            "secondary" => patch.secondary = Some(value),
            "accent" => patch.accent = Some(value),
            "background" => patch.background = Some(value),
            "surface" => patch.surface = Some(value),
            "text" => patch.text = Some(value),
            _ => return None,
        }
        Some(patch)
    }
}

impl ThemeColors {
    /// Merge supplied slots from `patch`, retaining the rest.
    pub fn merge(&mut self, patch: ColorPatch) {
        if let Some(v) = patch.primary {
            self.primary = v;
        }
        if let Some(v) = patch.secondary {
            self.secondary = v;
        }
        if let Some(v) = patch.accent {
            self.accent = v;
        }
        if let Some(v) = patch.background {
            self.background = v;
        }
        if let Some(v) = patch.surface {
            self.surface = v;
        }
        if let Some(v) = patch.text {
            self.text = v;
        }
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which wallpaper asset the display surface shows.
///
/// Switching modes is independent of which assets exist; both may be
/// populated at once and the mode just selects the visible one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallpaperMode {
    Image,
    Video,
}

/// App icon rendering style. Presentation-only; no generation impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconStyle {
    Minimal,
    Filled,
    Outline,
    Neumorphic,
}

impl std::str::FromStr for IconStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minimal" => Ok(Self::Minimal),
            "filled" => Ok(Self::Filled),
            "outline" => Ok(Self::Outline),
            "neumorphic" => Ok(Self::Neumorphic),
            other => Err(format!("unknown icon style: {other}")),
        }
    }
}

impl std::str::FromStr for WallpaperMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            other => Err(format!("unknown wallpaper mode: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// The full set of visual attributes describing one configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Opaque identifier; regenerated only when a brand-new theme is
    /// synthesized, never on in-place edits or import.
    pub id: String,
    pub name: String,
    pub description: String,
    pub colors: ThemeColors,
    /// Generation seed for wallpaper image/video. Persists across edits so
    /// animate/regenerate can reuse it.
    pub wallpaper_prompt: String,
    /// Encoded still image (data URI).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallpaper_image: Option<String>,
    /// Reference to a generated video asset (local path).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_wallpaper_url: Option<String>,
    pub active_wallpaper_mode: WallpaperMode,
    pub icon_style: IconStyle,
}

/// Partial theme update, applied field-by-field.
///
/// Optional theme fields use a double `Option`: the outer layer means
/// "present in the patch", the inner layer carries set-or-clear.
#[derive(Debug, Clone, Default)]
pub struct ThemePatch {
    /// Present only when a brand-new theme is synthesized.
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub colors: Option<ColorPatch>,
    pub wallpaper_prompt: Option<String>,
    pub wallpaper_image: Option<Option<String>>,
    pub live_wallpaper_url: Option<Option<String>>,
    pub active_wallpaper_mode: Option<WallpaperMode>,
    pub icon_style: Option<IconStyle>,
}

impl Theme {
    /// Shallow-merge `patch` into this theme. Colors merge per-slot; all
    /// other fields present in the patch fully replace the prior value.
    pub fn merge(&mut self, patch: ThemePatch) {
        if let Some(v) = patch.id {
            self.id = v;
        }
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(p) = patch.colors {
            self.colors.merge(p);
        }
        if let Some(v) = patch.wallpaper_prompt {
            self.wallpaper_prompt = v;
        }
        if let Some(v) = patch.wallpaper_image {
            self.wallpaper_image = v;
        }
        if let Some(v) = patch.live_wallpaper_url {
            self.live_wallpaper_url = v;
        }
        if let Some(v) = patch.active_wallpaper_mode {
            self.active_wallpaper_mode = v;
        }
        if let Some(v) = patch.icon_style {
            self.icon_style = v;
        }
    }
}

/// Generate a fresh opaque theme id.
pub fn new_theme_id() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    let mut id = String::with_capacity(32);
    for byte in bytes {
        id.push_str(&format!("{byte:02x}"));
    }
    id
}

/// The hardcoded session-start theme ("Oceanic Depth").
pub fn default_theme() -> Theme {
    Theme {
        id: "default".into(),
        name: "Oceanic Depth".into(),
        description: "A deep blue aesthetic with teal accents.".into(),
        colors: ThemeColors {
            primary: "#22d3ee".into(),
            secondary: "#0ea5e9".into(),
            accent: "#f472b6".into(),
            background: "#0f172a".into(),
            surface: "#1e293b".into(),
            text: "#f1f5f9".into(),
        },
        wallpaper_prompt: "Deep ocean bioluminescence, abstract shapes, dark blue and teal gradients"
            .into(),
        wallpaper_image: None,
        live_wallpaper_url: None,
        active_wallpaper_mode: WallpaperMode::Image,
        icon_style: IconStyle::Filled,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_retains_fields_absent_from_patch() {
        let mut theme = default_theme();
        let before = theme.clone();
        theme.merge(ThemePatch {
            name: Some("Sunset".into()),
            ..ThemePatch::default()
        });
        assert_eq!(theme.name, "Sunset");
        assert_eq!(theme.description, before.description);
        assert_eq!(theme.colors, before.colors);
        assert_eq!(theme.wallpaper_prompt, before.wallpaper_prompt);
        assert_eq!(theme.id, before.id);
    }

    #[test]
    fn merge_colors_is_nested_not_replacing() {
        let mut theme = default_theme();
        theme.merge(ThemePatch {
            colors: Some(ColorPatch {
                accent: Some("#ff0000".into()),
                ..ColorPatch::default()
            }),
            ..ThemePatch::default()
        });
        assert_eq!(theme.colors.accent, "#ff0000");
        // Untouched slots survive.
        assert_eq!(theme.colors.primary, "#22d3ee");
        assert_eq!(theme.colors.background, "#0f172a");
    }

    #[test]
    fn merge_can_clear_optional_assets() {
        let mut theme = default_theme();
        theme.wallpaper_image = Some("data:image/png;base64,AAAA".into());
        theme.live_wallpaper_url = Some("/tmp/wall.mp4".into());
        theme.merge(ThemePatch {
            wallpaper_image: Some(None),
            live_wallpaper_url: Some(None),
            ..ThemePatch::default()
        });
        assert!(theme.wallpaper_image.is_none());
        assert!(theme.live_wallpaper_url.is_none());
    }

    #[test]
    fn color_patch_for_slot_rejects_unknown_slot() {
        assert!(ColorPatch::for_slot("primary", "#fff").is_some());
        assert!(ColorPatch::for_slot("tertiary", "#fff").is_none());
    }

    #[test]
    fn theme_ids_are_unique_and_opaque() {
        let a = new_theme_id();
        let b = new_theme_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn theme_serializes_to_camel_case_document() {
        let theme = default_theme();
        let json = serde_json::to_value(&theme).unwrap();
        assert_eq!(json["activeWallpaperMode"], "image");
        assert_eq!(json["iconStyle"], "filled");
        assert_eq!(json["wallpaperPrompt"].as_str().unwrap(), theme.wallpaper_prompt);
        assert_eq!(json["colors"]["surface"], "#1e293b");
        // Absent optional assets are omitted, not null.
        assert!(json.get("wallpaperImage").is_none());
        assert!(json.get("liveWallpaperUrl").is_none());
    }

    #[test]
    fn theme_document_round_trips() {
        let mut theme = default_theme();
        theme.wallpaper_image = Some("data:image/png;base64,QUJD".into());
        let raw = serde_json::to_string(&theme).unwrap();
        let back: Theme = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, theme);
    }

    #[test]
    fn icon_style_parses_from_cli_strings() {
        assert_eq!("neumorphic".parse::<IconStyle>().unwrap(), IconStyle::Neumorphic);
        assert!("flat".parse::<IconStyle>().is_err());
    }
}
