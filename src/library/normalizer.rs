//! Turns raw imported records into canonical songs.
//!
//! Decoding is best-effort: missing or wrong-typed fields fall back to
//! defaults and nothing here returns an error.

use reqwest::Url;
use serde_json::Value;

use super::models::{RawSong, Song};

/// Host fragment of short links, where the id is the path
const SHORT_LINK_HOST: &str = "youtu.be";
const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Build the canonical watch URL for a video id
pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL_PREFIX, video_id)
}

/// Extract a video id from a watch URL or a short link.
///
/// Returns an empty string when the URL is malformed or carries no id.
pub fn video_id_from_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }

    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };

    let is_short_link = parsed
        .host_str()
        .map(|host| host.contains(SHORT_LINK_HOST))
        .unwrap_or(false);

    if is_short_link {
        parsed
            .path_segments()
            .and_then(|mut segments| segments.next())
            .unwrap_or("")
            .to_string()
    } else {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default()
    }
}

/// Truthiness of a loose value: null, false, 0 and "" count as missing
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String coercion of a scalar; falsy values and containers yield None
fn loose_string(value: Option<&Value>) -> Option<String> {
    let value = value.filter(|v| is_truthy(v))?;
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numeric coercion of a position, truncated toward zero
fn loose_position(value: Option<&Value>) -> Option<i64> {
    let value = value.filter(|v| is_truthy(v))?;
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().ok()?
            }
        }
        Value::Bool(true) => 1.0,
        _ => return None,
    };

    number.is_finite().then(|| number.trunc() as i64)
}

fn loose_choices(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| loose_string(Some(item)))
            .collect(),
        _ => Vec::new(),
    }
}

/// Normalize a single record found at `index` in its batch
pub fn normalize_song(raw: &RawSong, index: usize) -> Song {
    let position = loose_position(raw.position.as_ref()).unwrap_or(index as i64 + 1);
    let title = loose_string(raw.title.as_ref())
        .map(|t| t.trim().to_string())
        .unwrap_or_default();

    let url = loose_string(raw.url.as_ref()).unwrap_or_default();

    let mut video_id = loose_string(raw.video_id.as_ref())
        .map(|v| v.trim().to_string())
        .unwrap_or_default();
    if video_id.is_empty() && !url.is_empty() {
        video_id = video_id_from_url(&url);
    }

    let choices = loose_choices(raw.choices.as_ref());
    let correct = loose_string(raw.correct.as_ref()).unwrap_or_else(|| title.clone());

    let source_url = if !url.is_empty() {
        url
    } else if !video_id.is_empty() {
        watch_url(&video_id)
    } else {
        String::new()
    };

    Song {
        position,
        title,
        video_id,
        source_url,
        choices,
        correct,
    }
}

/// Normalize a whole batch, keeping input order
pub fn normalize_songs(raw: &[RawSong]) -> Vec<Song> {
    raw.iter()
        .enumerate()
        .map(|(index, song)| normalize_song(song, index))
        .collect()
}
