// JSON song list import and export
use serde_json::Value;

use crate::error::{QuizError, Result};
use crate::library::{RawSong, Song};

/// Parse a JSON document holding an array of song objects.
///
/// Invalid JSON is an error; so is valid JSON that is not an array. A bare
/// `null` counts as an empty list.
pub fn parse_json(text: &str) -> Result<Vec<RawSong>> {
    let document: Value = serde_json::from_str(text)?;

    match document {
        Value::Array(items) => Ok(items.iter().map(RawSong::from).collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(QuizError::InvalidDocument(format!(
            "expected an array of songs, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Pretty-printed JSON of the canonical collection
pub fn export_json(songs: &[Song]) -> Result<String> {
    Ok(serde_json::to_string_pretty(songs)?)
}
