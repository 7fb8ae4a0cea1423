//! Minimal CSV reader for song lists
//!
//! The first non-empty line is the header. Cells are split on plain commas;
//! quoted fields are not supported.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::library::normalizer::video_id_from_url;
use crate::library::RawSong;

/// Header patterns for each known column, matched case-insensitively
struct HeaderPatterns {
    position: Regex,
    title: Regex,
    url: Regex,
    video_id: Regex,
    choices: Regex,
    correct: Regex,
}

fn get_header_patterns() -> &'static HeaderPatterns {
    static PATTERNS: OnceLock<HeaderPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| HeaderPatterns {
        position: Regex::new(r"(?i)position").unwrap(),
        title: Regex::new(r"(?i)title").unwrap(),
        url: Regex::new(r"(?i)youtubeurl|url").unwrap(),
        video_id: Regex::new(r"(?i)videoid|id").unwrap(),
        choices: Regex::new(r"(?i)choices|alternativas").unwrap(),
        correct: Regex::new(r"(?i)correct|resposta").unwrap(),
    })
}

/// Index of each known column in the header, if present
#[derive(Debug, Default, PartialEq, Eq)]
struct ColumnMap {
    position: Option<usize>,
    title: Option<usize>,
    url: Option<usize>,
    video_id: Option<usize>,
    choices: Option<usize>,
    correct: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &str) -> Self {
        let cells: Vec<&str> = header.split(',').map(str::trim).collect();
        let patterns = get_header_patterns();
        let find = |regex: &Regex| cells.iter().position(|cell| regex.is_match(cell));

        Self {
            position: find(&patterns.position),
            title: find(&patterns.title),
            url: find(&patterns.url),
            video_id: find(&patterns.video_id),
            choices: find(&patterns.choices),
            correct: find(&patterns.correct),
        }
    }
}

/// Trimmed cell at `column`, or "" when the column or the cell is missing
fn cell<'a>(cells: &[&'a str], column: Option<usize>) -> &'a str {
    column
        .and_then(|index| cells.get(index))
        .copied()
        .map(str::trim)
        .unwrap_or("")
}

fn parse_row(line: &str, index: usize, columns: &ColumnMap) -> RawSong {
    let cells: Vec<&str> = line.split(',').collect();

    let title = cell(&cells, columns.title);
    let url = cell(&cells, columns.url);

    let video_id = match cell(&cells, columns.video_id) {
        "" => video_id_from_url(url),
        id => id.to_string(),
    };

    let choices: Vec<Value> = cell(&cells, columns.choices)
        .split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| Value::String(c.to_string()))
        .collect();

    let correct = match cell(&cells, columns.correct) {
        "" => title,
        correct => correct,
    };

    let position = match cell(&cells, columns.position) {
        "" => Value::from(index as u64 + 1),
        position => Value::String(position.to_string()),
    };

    RawSong {
        position: Some(position),
        title: Some(Value::String(title.to_string())),
        video_id: Some(Value::String(video_id)),
        url: Some(Value::String(url.to_string())),
        choices: Some(Value::Array(choices)),
        correct: Some(Value::String(correct.to_string())),
    }
}

/// Parse CSV text into raw song records
pub fn parse_csv(text: &str) -> Vec<RawSong> {
    let mut lines = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty());

    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let columns = ColumnMap::from_header(header);

    lines
        .enumerate()
        .map(|(index, line)| parse_row(line, index, &columns))
        .collect()
}
