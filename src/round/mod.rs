// Round module
// Quiz rounds, snippet timing and the player capability they rely on

pub mod controller;
pub mod player;
pub mod snippet;

pub use controller::{Phase, QuizEvent, QuizSnapshot, RoundController};
pub use player::{PlayerError, VideoPlayer};
