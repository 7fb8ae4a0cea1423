// Song Quiz - guess the title from a random snippet
// Module declarations
pub mod error;
pub mod import;
pub mod library;
pub mod logging;
pub mod round;
pub mod settings;

#[cfg(feature = "desktop")]
mod commands;
#[cfg(feature = "desktop")]
mod state;
#[cfg(feature = "desktop")]
mod webview_player;

#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use anyhow::Context;
    use std::sync::Arc;
    use tauri::{Emitter, Manager};
    use tokio::sync::broadcast::error::RecvError;
    use tracing::{info, warn};

    use crate::commands;
    use crate::import::source::load_default;
    use crate::logging::init_logging;
    use crate::round::RoundController;
    use crate::settings::QuizSettings;
    use crate::state::AppState;
    use crate::webview_player::WebviewPlayer;

    const QUIZ_EVENT: &str = "quiz://event";
    const QUIZ_STATE_EVENT: &str = "quiz://state";

    fn init_state(app: &tauri::App) -> anyhow::Result<AppState> {
        // Get app data directory
        let app_dir = app
            .path()
            .app_data_dir()
            .context("Failed to get app data directory")?;

        let settings = QuizSettings::load(&app_dir).unwrap_or_else(|e| {
            warn!("Ignoring unreadable settings: {}", e);
            QuizSettings::default()
        });

        let player = WebviewPlayer::new(app.handle().clone());
        Ok(AppState::new(player, settings, app_dir))
    }

    /// Forward controller events, plus a fresh snapshot, to the web view
    fn forward_events(app: tauri::AppHandle, quiz: Arc<RoundController>) {
        let mut events = quiz.subscribe();
        tauri::async_runtime::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        let _ = app.emit(QUIZ_EVENT, &event);
                        let _ = app.emit(QUIZ_STATE_EVENT, quiz.snapshot());
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Dropped {} quiz events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        init_logging();

        tauri::Builder::default()
            .plugin(tauri_plugin_opener::init())
            .plugin(tauri_plugin_dialog::init())
            .setup(|app| {
                let app_state = init_state(app)?;
                let quiz = Arc::clone(&app_state.quiz);
                let source = app_state.source.clone();
                app.manage(app_state);

                forward_events(app.handle().clone(), Arc::clone(&quiz));

                // Load the default song list without holding up the window
                tauri::async_runtime::spawn(async move {
                    let raw = load_default(&source).await;
                    quiz.apply_songs(&raw);
                });

                info!("Song quiz ready");
                Ok(())
            })
            .invoke_handler(tauri::generate_handler![
                commands::get_quiz_state,
                commands::player_ready,
                commands::report_player_duration,
                commands::start_quiz,
                commands::play_snippet,
                commands::replay_snippet,
                commands::next_round,
                commands::answer_choice,
                commands::set_snippet_seconds,
                commands::set_shuffle_all,
                commands::set_hide_video,
                commands::get_settings,
                commands::save_settings,
                commands::import_songs,
                commands::export_songs,
                commands::reload_songs,
            ])
            .run(tauri::generate_context!())
            .expect("error while running tauri application");
    }
}
