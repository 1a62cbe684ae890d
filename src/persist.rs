//! Theme documents and wallpaper assets on disk.
//!
//! Covers theme export/import, local-image wallpaper import, downloaded
//! video assets, and the session file the CLI keeps between invocations.

use crate::api::wire::to_data_uri;
use crate::error::PersistError;
use crate::theme::Theme;
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Write the theme as a pretty-printed JSON document.
pub fn export_theme(theme: &Theme, path: &Path) -> Result<(), PersistError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string_pretty(theme)?;
    fs::write(path, raw)?;
    Ok(())
}

/// Read a theme document.
///
/// Validation is minimal: the document must carry a `colors` field. The id
/// is preserved as stored; import never regenerates it.
pub fn import_theme(path: &Path) -> Result<Theme, PersistError> {
    let raw = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    if value.get("colors").is_none() {
        return Err(PersistError::InvalidDocument(
            "missing colors field".into(),
        ));
    }
    let theme: Theme = serde_json::from_value(value)?;
    Ok(theme)
}

/// Read a local image file as a wallpaper data URI.
pub fn import_wallpaper_image(path: &Path) -> Result<String, PersistError> {
    let bytes = fs::read(path)?;
    let mime = mime_for_extension(path);
    Ok(to_data_uri(mime, &B64.encode(&bytes)))
}

/// Write downloaded video bytes under `dir` and return the asset path.
pub fn save_video_asset(dir: &Path, bytes: &[u8]) -> Result<PathBuf, PersistError> {
    fs::create_dir_all(dir)?;
    let mut suffix = [0u8; 8];
    OsRng.fill_bytes(&mut suffix);
    let name = format!(
        "wallpaper-{}.mp4",
        suffix.iter().map(|b| format!("{b:02x}")).collect::<String>()
    );
    let path = dir.join(name);
    fs::write(&path, bytes)?;
    debug!(path = %path.display(), len = bytes.len(), "video asset saved");
    Ok(path)
}

/// Load the persisted session theme, if a valid one exists.
pub fn load_session(path: &Path) -> Option<Theme> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

/// Persist the session theme for the next invocation.
pub fn save_session(theme: &Theme, path: &Path) -> Result<(), PersistError> {
    export_theme(theme, path)
}

fn mime_for_extension(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::default_theme;

    fn temp_dir(prefix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "themeforge-{prefix}-{}-{}",
            std::process::id(),
            crate::theme::new_theme_id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn export_import_round_trips_with_id_preserved() {
        let dir = temp_dir("roundtrip");
        let path = dir.join("theme.json");
        let mut theme = default_theme();
        theme.id = "abc123".into();
        theme.wallpaper_image = Some("data:image/png;base64,QUJD".into());

        export_theme(&theme, &path).unwrap();
        let back = import_theme(&path).unwrap();
        assert_eq!(back, theme);
        assert_eq!(back.id, "abc123");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn import_rejects_document_without_colors() {
        let dir = temp_dir("nocolors");
        let path = dir.join("bad.json");
        fs::write(&path, r#"{"id": "x", "name": "No Palette"}"#).unwrap();
        let err = import_theme(&path).expect_err("colors required");
        assert!(matches!(err, PersistError::InvalidDocument(_)));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn wallpaper_import_encodes_data_uri_with_mime() {
        let dir = temp_dir("image");
        let path = dir.join("wall.jpg");
        fs::write(&path, b"fakejpegbytes").unwrap();
        let uri = import_wallpaper_image(&path).unwrap();
        assert!(uri.starts_with("data:image/jpeg;base64,"), "got: {uri}");
        let payload = uri.split(',').nth(1).unwrap();
        assert_eq!(B64.decode(payload).unwrap(), b"fakejpegbytes");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn video_assets_get_unique_names() {
        let dir = temp_dir("assets");
        let a = save_video_asset(&dir, b"video-a").unwrap();
        let b = save_video_asset(&dir, b"video-b").unwrap();
        assert_ne!(a, b);
        assert_eq!(fs::read(&a).unwrap(), b"video-a");
        assert!(a.file_name().unwrap().to_str().unwrap().ends_with(".mp4"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_session_loads_as_none() {
        let dir = temp_dir("session");
        assert!(load_session(&dir.join("absent.json")).is_none());
        let _ = fs::remove_dir_all(&dir);
    }
}
