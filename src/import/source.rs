// Default song list origin: a local file or an http(s) URL
use chrono::Utc;
use reqwest::Url;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::json::parse_json;
use crate::error::Result;
use crate::library::RawSong;

/// Query parameter appended to URL fetches so caches never serve a stale list
const CACHE_BUST_PARAM: &str = "_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SongSource {
    File(PathBuf),
    Url(Url),
}

impl SongSource {
    /// Interpret a configured source. http(s) URLs are fetched; anything
    /// else is a path, resolved against `base_dir` when relative.
    pub fn parse(source: &str, base_dir: &Path) -> Self {
        let source = source.trim();
        if source.starts_with("http://") || source.starts_with("https://") {
            if let Ok(url) = Url::parse(source) {
                return SongSource::Url(url);
            }
        }

        let path = Path::new(source);
        if path.is_absolute() {
            SongSource::File(path.to_path_buf())
        } else {
            SongSource::File(base_dir.join(path))
        }
    }

    /// Fetch and parse the song list
    pub async fn fetch(&self) -> Result<Vec<RawSong>> {
        let text = match self {
            SongSource::File(path) => tokio::fs::read_to_string(path).await?,
            SongSource::Url(url) => {
                reqwest::get(cache_busted(url))
                    .await?
                    .error_for_status()?
                    .text()
                    .await?
            }
        };

        parse_json(&text)
    }
}

impl fmt::Display for SongSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SongSource::File(path) => write!(f, "{}", path.display()),
            SongSource::Url(url) => write!(f, "{}", url),
        }
    }
}

fn cache_busted(url: &Url) -> Url {
    let mut url = url.clone();
    url.query_pairs_mut()
        .append_pair(CACHE_BUST_PARAM, &Utc::now().timestamp_millis().to_string());
    url
}

/// Load the default list at startup. Any failure yields an empty list.
pub async fn load_default(source: &SongSource) -> Vec<RawSong> {
    match source.fetch().await {
        Ok(songs) => {
            info!("Loaded {} songs from {}", songs.len(), source);
            songs
        }
        Err(e) => {
            warn!("{} not found or invalid, starting with empty list: {}", source, e);
            Vec::new()
        }
    }
}

/// Re-fetch the default list on request; failures go back to the caller
pub async fn reload(source: &SongSource) -> Result<Vec<RawSong>> {
    let songs = source.fetch().await?;
    info!("Reloaded {} songs from {}", songs.len(), source);
    Ok(songs)
}
