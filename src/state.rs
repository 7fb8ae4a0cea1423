// Application state management
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

use crate::import::SongSource;
use crate::round::RoundController;
use crate::settings::QuizSettings;
use crate::webview_player::WebviewPlayer;

pub struct AppState {
    pub quiz: Arc<RoundController>,
    pub player: Arc<WebviewPlayer>,
    pub settings: Mutex<QuizSettings>,
    pub source: SongSource,
    pub app_dir: PathBuf,
}

impl AppState {
    pub fn new(player: WebviewPlayer, settings: QuizSettings, app_dir: PathBuf) -> Self {
        let player = Arc::new(player);
        let quiz = Arc::new(RoundController::new(player.clone(), &settings));
        let source = SongSource::parse(&settings.default_source, &app_dir);

        Self {
            quiz,
            player,
            settings: Mutex::new(settings),
            source,
            app_dir,
        }
    }

    /// Persist the current settings; failures are logged, not fatal
    pub fn save_settings(&self) {
        let settings = self.settings.lock().clone();
        if let Err(e) = settings.save(&self.app_dir) {
            tracing::warn!("Failed to save settings: {}", e);
        }
    }
}
