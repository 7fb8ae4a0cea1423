// Settings management and persistence
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{QuizError, Result};
use crate::round::player::PlayerOptions;

pub const DEFAULT_SNIPPET_SECONDS: u32 = 12;

/// Default song list, relative to the app data directory
pub const DEFAULT_SONG_SOURCE: &str = "songs.json";

/// Snippet length as requested; a zero-length snippet falls back to the default
pub fn sanitize_snippet_seconds(seconds: u32) -> u32 {
    if seconds == 0 {
        DEFAULT_SNIPPET_SECONDS
    } else {
        seconds
    }
}

/// Main quiz settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
    pub version: i32, // Settings schema version for future migrations
    pub snippet_seconds: u32,
    pub shuffle_all: bool,
    pub hide_video: bool,
    /// Path or http(s) URL of the default song list
    pub default_source: String,
    /// Pause before talking to the player after a load request
    pub settle_delay_ms: u64,
    pub player: PlayerOptions,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            version: 1,
            snippet_seconds: DEFAULT_SNIPPET_SECONDS,
            shuffle_all: false,
            hide_video: true,
            default_source: DEFAULT_SONG_SOURCE.to_string(),
            settle_delay_ms: 100,
            player: PlayerOptions::default(),
        }
    }
}

impl QuizSettings {
    /// Get the settings file path
    pub fn get_settings_path(app_dir: &Path) -> PathBuf {
        app_dir.join("settings.json")
    }

    /// Load settings from file, or return defaults if file doesn't exist
    pub fn load(app_dir: &Path) -> Result<Self> {
        let path = Self::get_settings_path(app_dir);

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;

        let mut settings: QuizSettings = serde_json::from_str(&content)
            .map_err(|e| QuizError::Settings(format!("Failed to parse settings: {}", e)))?;
        settings.snippet_seconds = sanitize_snippet_seconds(settings.snippet_seconds);

        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub fn save(&self, app_dir: &Path) -> Result<()> {
        // Ensure directory exists
        fs::create_dir_all(app_dir)?;

        let path = Self::get_settings_path(app_dir);
        let content = serde_json::to_string_pretty(self)?;

        fs::write(&path, content)?;

        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = QuizSettings::load(dir.path()).unwrap();
        assert_eq!(settings, QuizSettings::default());
        assert_eq!(settings.snippet_seconds, 12);
        assert_eq!(settings.settle_delay_ms, 100);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let settings = QuizSettings {
            snippet_seconds: 20,
            shuffle_all: true,
            ..QuizSettings::default()
        };

        settings.save(dir.path()).unwrap();
        let loaded = QuizSettings::load(dir.path()).unwrap();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            QuizSettings::get_settings_path(dir.path()),
            r#"{ "snippet_seconds": 90, "hide_video": false }"#,
        )
        .unwrap();

        let loaded = QuizSettings::load(dir.path()).unwrap();

        assert_eq!(loaded.snippet_seconds, 90);
        assert!(!loaded.hide_video);
        assert_eq!(loaded.default_source, DEFAULT_SONG_SOURCE);
    }

    #[test]
    fn test_zero_snippet_length_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            QuizSettings::get_settings_path(dir.path()),
            r#"{ "snippet_seconds": 0 }"#,
        )
        .unwrap();

        let loaded = QuizSettings::load(dir.path()).unwrap();

        assert_eq!(loaded.snippet_seconds, DEFAULT_SNIPPET_SECONDS);
        assert_eq!(sanitize_snippet_seconds(45), 45);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(QuizSettings::get_settings_path(dir.path()), "{ nope").unwrap();

        assert!(matches!(
            QuizSettings::load(dir.path()),
            Err(QuizError::Settings(_))
        ));
    }
}
