// Error types for the quiz core
use thiserror::Error;

/// Result type for quiz operations
pub type Result<T> = std::result::Result<T, QuizError>;

#[derive(Error, Debug)]
pub enum QuizError {
    /// File read/write failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Import text is not valid JSON, or a value failed to serialize
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON that is not a list of songs
    #[error("Invalid song document: {0}")]
    InvalidDocument(String),

    /// Import file with an extension other than .json or .csv
    #[error("Unsupported import format: {0}")]
    UnsupportedFormat(String),

    /// Network failure while fetching the song list
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Video player is not ready yet")]
    PlayerNotReady,

    #[error("No round in progress")]
    NoActiveRound,

    #[error("This round was already answered")]
    AlreadyAnswered,

    #[error("Not one of the offered choices: {0}")]
    UnknownChoice(String),
}
