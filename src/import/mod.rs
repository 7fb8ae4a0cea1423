// Import/export module
// Reads song lists from JSON or CSV and writes the canonical collection back as JSON

pub mod csv;
pub mod json;
pub mod source;

pub use source::SongSource;

use std::path::Path;
use tracing::info;

use crate::error::{QuizError, Result};
use crate::library::{RawSong, Song};

/// File name offered for exports
pub const DEFAULT_EXPORT_FILE_NAME: &str = "songs_export.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Csv,
}

impl ImportFormat {
    /// Pick the parser from the file name suffix, ignoring case
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(ImportFormat::Json),
            "csv" => Ok(ImportFormat::Csv),
            _ => Err(QuizError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn parse(&self, text: &str) -> Result<Vec<RawSong>> {
        match self {
            ImportFormat::Json => json::parse_json(text),
            ImportFormat::Csv => Ok(csv::parse_csv(text)),
        }
    }
}

/// Read a user-supplied .json or .csv file into raw records
pub async fn import_file(path: &Path) -> Result<Vec<RawSong>> {
    let format = ImportFormat::from_path(path)?;
    let text = tokio::fs::read_to_string(path).await?;
    let songs = format.parse(&text)?;

    info!("Imported {} songs from {}", songs.len(), path.display());
    Ok(songs)
}

/// Write the collection as pretty-printed JSON
pub async fn export_to_file(songs: &[Song], path: &Path) -> Result<()> {
    let content = json::export_json(songs)?;
    tokio::fs::write(path, content).await?;

    info!("Exported {} songs to {}", songs.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::normalizer::normalize_songs;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImportFormat::from_path(Path::new("list.json")).unwrap(), ImportFormat::Json);
        assert_eq!(ImportFormat::from_path(Path::new("LIST.CSV")).unwrap(), ImportFormat::Csv);
        assert!(matches!(
            ImportFormat::from_path(Path::new("list.txt")),
            Err(QuizError::UnsupportedFormat(_))
        ));
        assert!(ImportFormat::from_path(Path::new("noextension")).is_err());
    }

    #[tokio::test]
    async fn test_import_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("songs.csv");
        std::fs::write(&path, "title,videoId\nA,abcdef\nB,ghijkl\n").unwrap();

        let raw = import_file(&path).await.unwrap();
        let songs = normalize_songs(&raw);

        assert_eq!(songs.len(), 2);
        assert_eq!(songs[1].video_id, "ghijkl");
    }

    #[tokio::test]
    async fn test_import_invalid_json_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("songs.json");
        std::fs::write(&path, "[{\"title\":").unwrap();

        assert!(matches!(import_file(&path).await, Err(QuizError::Json(_))));
    }

    #[tokio::test]
    async fn test_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILE_NAME);
        let songs = normalize_songs(&json::parse_json(r#"[{"title":"A","videoId":"abcdef"}]"#).unwrap());

        export_to_file(&songs, &path).await.unwrap();
        let reimported = normalize_songs(&import_file(&path).await.unwrap());

        assert_eq!(reimported, songs);
    }
}
