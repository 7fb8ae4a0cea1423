// Tauri command handlers
use std::path::PathBuf;
use std::sync::Arc;
use tauri::State;

use crate::import::{self, source, DEFAULT_EXPORT_FILE_NAME};
use crate::round::QuizSnapshot;
use crate::settings::QuizSettings;
use crate::state::AppState;

// ===== Quiz Commands =====

#[tauri::command]
pub fn get_quiz_state(state: State<'_, AppState>) -> Result<QuizSnapshot, String> {
    Ok(state.quiz.snapshot())
}

#[tauri::command]
pub fn player_ready(state: State<'_, AppState>) -> Result<QuizSnapshot, String> {
    Ok(state.quiz.mark_player_ready())
}

#[tauri::command]
pub fn report_player_duration(seconds: f64, state: State<'_, AppState>) -> Result<(), String> {
    state.player.set_duration(seconds);
    Ok(())
}

#[tauri::command]
pub fn start_quiz(state: State<'_, AppState>) -> Result<QuizSnapshot, String> {
    state
        .quiz
        .start()
        .map_err(|e| format!("Failed to start quiz: {}", e))
}

#[tauri::command]
pub async fn play_snippet(state: State<'_, AppState>) -> Result<QuizSnapshot, String> {
    let quiz = Arc::clone(&state.quiz);
    Ok(quiz.play().await)
}

#[tauri::command]
pub async fn replay_snippet(state: State<'_, AppState>) -> Result<QuizSnapshot, String> {
    let quiz = Arc::clone(&state.quiz);
    Ok(quiz.replay().await)
}

#[tauri::command]
pub fn next_round(state: State<'_, AppState>) -> Result<QuizSnapshot, String> {
    Ok(state.quiz.next_round())
}

#[tauri::command]
pub fn answer_choice(choice: String, state: State<'_, AppState>) -> Result<QuizSnapshot, String> {
    state
        .quiz
        .answer(&choice)
        .map_err(|e| format!("Failed to answer: {}", e))
}

// ===== Option Commands =====

#[tauri::command]
pub fn set_snippet_seconds(seconds: u32, state: State<'_, AppState>) -> Result<QuizSnapshot, String> {
    let snapshot = state.quiz.set_snippet_seconds(seconds);
    state.settings.lock().snippet_seconds = snapshot.snippet_seconds;
    state.save_settings();
    Ok(snapshot)
}

#[tauri::command]
pub fn set_shuffle_all(enabled: bool, state: State<'_, AppState>) -> Result<QuizSnapshot, String> {
    let snapshot = state.quiz.set_shuffle_all(enabled);
    state.settings.lock().shuffle_all = enabled;
    state.save_settings();
    Ok(snapshot)
}

#[tauri::command]
pub fn set_hide_video(hide: bool, state: State<'_, AppState>) -> Result<QuizSettings, String> {
    let settings = {
        let mut settings = state.settings.lock();
        settings.hide_video = hide;
        settings.clone()
    };
    state.save_settings();
    Ok(settings)
}

#[tauri::command]
pub fn get_settings(state: State<'_, AppState>) -> Result<QuizSettings, String> {
    Ok(state.settings.lock().clone())
}

#[tauri::command]
pub fn save_settings(mut settings: QuizSettings, state: State<'_, AppState>) -> Result<QuizSnapshot, String> {
    // Persist what the quiz actually uses
    settings.snippet_seconds = state
        .quiz
        .set_snippet_seconds(settings.snippet_seconds)
        .snippet_seconds;
    let snapshot = state.quiz.set_shuffle_all(settings.shuffle_all);

    settings
        .save(&state.app_dir)
        .map_err(|e| format!("Failed to save settings: {}", e))?;

    *state.settings.lock() = settings;
    Ok(snapshot)
}

// ===== Song List Commands =====

#[tauri::command]
pub async fn import_songs(path: String, state: State<'_, AppState>) -> Result<QuizSnapshot, String> {
    let raw = import::import_file(&PathBuf::from(&path))
        .await
        .map_err(|e| format!("Failed to import {}: {}", path, e))?;

    Ok(state.quiz.apply_songs(&raw))
}

#[tauri::command]
pub async fn export_songs(path: Option<String>, state: State<'_, AppState>) -> Result<String, String> {
    let path = path
        .map(PathBuf::from)
        .unwrap_or_else(|| state.app_dir.join(DEFAULT_EXPORT_FILE_NAME));
    let songs = state.quiz.songs();

    import::export_to_file(&songs, &path)
        .await
        .map_err(|e| format!("Failed to export songs: {}", e))?;

    Ok(path.to_string_lossy().to_string())
}

#[tauri::command]
pub async fn reload_songs(state: State<'_, AppState>) -> Result<QuizSnapshot, String> {
    // On failure the current collection stays as it is
    let raw = source::reload(&state.source)
        .await
        .map_err(|e| format!("Could not load {}: {}", state.source, e))?;

    Ok(state.quiz.apply_songs(&raw))
}
