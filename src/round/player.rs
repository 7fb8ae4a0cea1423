// Video player capability
// The quiz only needs a handful of commands from the embedded player; every
// one of them has a no-op default so partial players still work.
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    /// The player has not been created or has gone away
    #[error("Player unavailable: {0}")]
    Unavailable(String),

    #[error("Player command failed: {0}")]
    Command(String),
}

/// Suggested playback quality passed along with a load request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackQuality {
    #[default]
    Small,
    Medium,
    Large,
    Default,
}

impl PlaybackQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackQuality::Small => "small",
            PlaybackQuality::Medium => "medium",
            PlaybackQuality::Large => "large",
            PlaybackQuality::Default => "default",
        }
    }
}

/// Options the embedded player is constructed with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerOptions {
    pub width: u32,
    pub height: u32,
    pub controls: bool,
    pub modest_branding: bool,
    pub related_videos: bool,
    pub keyboard: bool,
    pub fullscreen: bool,
    pub inline_playback: bool,
    pub quality: PlaybackQuality,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            controls: false,
            modest_branding: true,
            related_videos: false,
            keyboard: false,
            fullscreen: false,
            inline_playback: true,
            quality: PlaybackQuality::Small,
        }
    }
}

/// Commands the round controller issues to the external player
pub trait VideoPlayer: Send + Sync {
    /// Load a video and start it from `start_seconds`
    fn load_video(
        &self,
        _video_id: &str,
        _start_seconds: u64,
        _quality: PlaybackQuality,
    ) -> Result<(), PlayerError> {
        Ok(())
    }

    fn play(&self) -> Result<(), PlayerError> {
        Ok(())
    }

    fn pause(&self) -> Result<(), PlayerError> {
        Ok(())
    }

    fn unmute(&self) -> Result<(), PlayerError> {
        Ok(())
    }

    /// Total duration of the loaded video in seconds, 0 when unknown
    fn duration(&self) -> f64 {
        0.0
    }
}
