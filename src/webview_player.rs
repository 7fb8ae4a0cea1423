// Video player living in the web view
// Commands are forwarded as events to the page hosting the embedded player;
// the page reports the loaded video's duration back through a command.
use parking_lot::Mutex;
use serde::Serialize;
use tauri::{AppHandle, Emitter};

use crate::round::player::{PlaybackQuality, PlayerError, VideoPlayer};

pub const EVENT_LOAD: &str = "player://load";
pub const EVENT_PLAY: &str = "player://play";
pub const EVENT_PAUSE: &str = "player://pause";
pub const EVENT_UNMUTE: &str = "player://unmute";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoadRequest {
    video_id: String,
    start_seconds: u64,
    suggested_quality: &'static str,
}

pub struct WebviewPlayer {
    app: AppHandle,
    duration: Mutex<f64>,
}

impl WebviewPlayer {
    pub fn new(app: AppHandle) -> Self {
        Self {
            app,
            duration: Mutex::new(0.0),
        }
    }

    /// Record the duration the page reported for the loaded video
    pub fn set_duration(&self, seconds: f64) {
        *self.duration.lock() = if seconds.is_finite() && seconds > 0.0 { seconds } else { 0.0 };
    }

    fn send<S: Serialize + Clone>(&self, event: &str, payload: S) -> Result<(), PlayerError> {
        self.app
            .emit(event, payload)
            .map_err(|e| PlayerError::Command(format!("{}: {}", event, e)))
    }
}

impl VideoPlayer for WebviewPlayer {
    fn load_video(
        &self,
        video_id: &str,
        start_seconds: u64,
        quality: PlaybackQuality,
    ) -> Result<(), PlayerError> {
        self.send(
            EVENT_LOAD,
            LoadRequest {
                video_id: video_id.to_string(),
                start_seconds,
                suggested_quality: quality.as_str(),
            },
        )
    }

    fn play(&self) -> Result<(), PlayerError> {
        self.send(EVENT_PLAY, ())
    }

    fn pause(&self) -> Result<(), PlayerError> {
        self.send(EVENT_PAUSE, ())
    }

    fn unmute(&self) -> Result<(), PlayerError> {
        self.send(EVENT_UNMUTE, ())
    }

    fn duration(&self) -> f64 {
        *self.duration.lock()
    }
}
