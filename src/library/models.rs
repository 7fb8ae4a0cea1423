// Data models
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical song record, after normalization and choice completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub position: i64,
    pub title: String,
    pub video_id: String,
    #[serde(rename = "youtubeUrl")]
    pub source_url: String,
    pub choices: Vec<String>,
    pub correct: String,
}

/// Loosely-typed song as it comes out of an import document.
///
/// Every field keeps whatever JSON value was supplied; coercion happens
/// in the normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSong {
    pub position: Option<Value>,
    pub title: Option<Value>,
    pub video_id: Option<Value>,
    pub url: Option<Value>,
    pub choices: Option<Value>,
    pub correct: Option<Value>,
}

/// Keys accepted for the source URL, in order of preference
const URL_KEYS: &[&str] = &["youtubeUrl", "sourceUrl", "url"];

impl RawSong {
    fn from_object(object: &Map<String, Value>) -> Self {
        let field = |key: &str| object.get(key).filter(|v| !v.is_null()).cloned();

        Self {
            position: field("position"),
            title: field("title"),
            video_id: field("videoId"),
            url: URL_KEYS.iter().find_map(|key| field(*key)),
            choices: field("choices"),
            correct: field("correct"),
        }
    }
}

impl From<&Value> for RawSong {
    /// Anything other than a JSON object becomes an empty record
    fn from(value: &Value) -> Self {
        match value {
            Value::Object(object) => Self::from_object(object),
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_song_from_object() {
        let raw = RawSong::from(&json!({
            "position": 3,
            "title": "Song",
            "videoId": "abcdef",
            "choices": ["A", "B"],
            "extra": true
        }));

        assert_eq!(raw.position, Some(json!(3)));
        assert_eq!(raw.title, Some(json!("Song")));
        assert_eq!(raw.video_id, Some(json!("abcdef")));
        assert_eq!(raw.choices, Some(json!(["A", "B"])));
        assert_eq!(raw.correct, None);
    }

    #[test]
    fn test_raw_song_url_key_preference() {
        let raw = RawSong::from(&json!({ "url": "u", "youtubeUrl": "y" }));
        assert_eq!(raw.url, Some(json!("y")));

        let raw = RawSong::from(&json!({ "sourceUrl": "s", "url": "u" }));
        assert_eq!(raw.url, Some(json!("s")));
    }

    #[test]
    fn test_raw_song_from_non_object() {
        assert_eq!(RawSong::from(&json!(42)), RawSong::default());
        assert_eq!(RawSong::from(&json!("title")), RawSong::default());
    }

    #[test]
    fn test_song_serializes_with_legacy_keys() {
        let song = Song {
            position: 1,
            title: "A".to_string(),
            video_id: "abcdef".to_string(),
            source_url: "https://www.youtube.com/watch?v=abcdef".to_string(),
            choices: vec!["A".to_string()],
            correct: "A".to_string(),
        };

        let value = serde_json::to_value(&song).unwrap();
        assert_eq!(value["videoId"], "abcdef");
        assert_eq!(value["youtubeUrl"], "https://www.youtube.com/watch?v=abcdef");
        assert!(value.get("sourceUrl").is_none());
    }
}
