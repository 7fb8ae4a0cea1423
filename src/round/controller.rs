// Round controller
// Sequences rounds over the playable songs, keeps the score and drives
// snippet playback with at most one pending stop timer.
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use super::player::{PlaybackQuality, PlayerError, VideoPlayer};
use super::snippet::{snippet_offset, StopTimer};
use crate::error::{QuizError, Result};
use crate::library::{RawSong, Song, SongLibrary};
use crate::settings::settings::sanitize_snippet_seconds;
use crate::settings::QuizSettings;

const EVENT_CHANNEL_CAPACITY: usize = 64;
const FEEDBACK_CORRECT: &str = "Correct!";

/// Where the quiz currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No round has been started
    Idle,
    /// Choices are shown, waiting for play or an answer
    Ready,
    /// A snippet is sounding; play, replay and next are disabled
    Playing,
    /// The round's choice was made; choice buttons are disabled
    Answered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hud {
    pub round: usize,
    pub total_rounds: usize,
    pub score: u32,
    pub playable: usize,
    pub songs: usize,
}

/// Which buttons the UI should enable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub start: bool,
    pub play: bool,
    pub replay: bool,
    pub next: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceMark {
    Correct,
    Wrong,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceView {
    pub label: String,
    pub enabled: bool,
    pub mark: Option<ChoiceMark>,
}

/// Everything the UI needs to render the quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizSnapshot {
    pub phase: Phase,
    pub hud: Hud,
    pub controls: Controls,
    pub choices: Vec<ChoiceView>,
    pub feedback: String,
    pub overlay_visible: bool,
    pub audio_unlocked: bool,
    pub snippet_seconds: u32,
    pub shuffle_all: bool,
}

/// Outcome of the single answer a round accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub choice: String,
    pub correct: bool,
    /// The right answer for the round
    pub expected: String,
}

/// Notifications for the UI layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event_type", content = "data")]
pub enum QuizEvent {
    LibraryLoaded { songs: usize, playable: usize },
    RoundStarted { round: usize, total_rounds: usize },
    SnippetStarted { video_id: String, start_seconds: u64, snippet_seconds: u32 },
    SnippetStopped,
    PlaybackFailed { message: String },
    Answered { choice: String, correct: bool, score: u32 },
}

/// Session state, only ever touched with the controller's lock held
struct Session {
    library: SongLibrary,
    cursor: Option<usize>,
    round: usize,
    score: u32,
    player_ready: bool,
    audio_unlocked: bool,
    playing: bool,
    answer: Option<AnswerOutcome>,
    feedback: String,
    snippet_seconds: u32,
    shuffle_all: bool,
    /// Bumped on every play and every interruption so stale work can tell
    play_token: u64,
    stop_timer: Option<StopTimer>,
    rng: StdRng,
}

impl Session {
    fn new(settings: &QuizSettings) -> Self {
        Self {
            library: SongLibrary::default(),
            cursor: None,
            round: 0,
            score: 0,
            player_ready: false,
            audio_unlocked: false,
            playing: false,
            answer: None,
            feedback: String::new(),
            snippet_seconds: sanitize_snippet_seconds(settings.snippet_seconds),
            shuffle_all: settings.shuffle_all,
            play_token: 0,
            stop_timer: None,
            rng: StdRng::from_entropy(),
        }
    }

    fn current_song(&self) -> Option<&Song> {
        self.cursor.and_then(|index| self.library.playable().get(index))
    }

    /// Cancel any pending stop timer and leave the playing state.
    ///
    /// Returns whether a snippet was sounding, so the caller can pause the player.
    fn interrupt_playback(&mut self) -> bool {
        if let Some(timer) = self.stop_timer.take() {
            timer.cancel();
        }
        self.play_token += 1;
        std::mem::replace(&mut self.playing, false)
    }

    /// Move the cursor to the next playable song, wrapping around
    fn advance(&mut self) -> Option<QuizEvent> {
        let total = self.library.playable().len();
        if total == 0 {
            return None;
        }

        self.feedback.clear();
        self.answer = None;

        let index = self.cursor.map(|c| (c + 1) % total).unwrap_or(0);
        self.cursor = Some(index);
        self.round = index + 1;

        info!("Round {}/{}", self.round, total);
        Some(QuizEvent::RoundStarted {
            round: self.round,
            total_rounds: total,
        })
    }

    fn phase(&self) -> Phase {
        if self.cursor.is_none() {
            Phase::Idle
        } else if self.playing {
            Phase::Playing
        } else if self.answer.is_some() {
            Phase::Answered
        } else {
            Phase::Ready
        }
    }

    fn snapshot(&self) -> QuizSnapshot {
        let has_round = self.current_song().is_some();
        let idle_controls = self.audio_unlocked && !self.playing;

        let choices = self
            .current_song()
            .map(|song| {
                song.choices
                    .iter()
                    .map(|label| ChoiceView {
                        label: label.clone(),
                        enabled: self.answer.is_none(),
                        mark: self
                            .answer
                            .as_ref()
                            .filter(|a| a.choice == *label)
                            .map(|a| if a.correct { ChoiceMark::Correct } else { ChoiceMark::Wrong }),
                    })
                    .collect()
            })
            .unwrap_or_default();

        QuizSnapshot {
            phase: self.phase(),
            hud: Hud {
                round: self.round,
                total_rounds: self.library.playable().len(),
                score: self.score,
                playable: self.library.playable().len(),
                songs: self.library.songs().len(),
            },
            controls: Controls {
                start: self.player_ready && !self.audio_unlocked,
                play: idle_controls && has_round,
                replay: idle_controls && has_round,
                next: idle_controls && !self.library.playable().is_empty(),
            },
            choices,
            feedback: self.feedback.clone(),
            overlay_visible: self.playing,
            audio_unlocked: self.audio_unlocked,
            snippet_seconds: self.snippet_seconds,
            shuffle_all: self.shuffle_all,
        }
    }
}

/// Owns the quiz session and the player it drives
pub struct RoundController {
    session: Arc<Mutex<Session>>,
    player: Arc<dyn VideoPlayer>,
    events: broadcast::Sender<QuizEvent>,
    settle_delay: Duration,
    quality: PlaybackQuality,
}

impl RoundController {
    pub fn new(player: Arc<dyn VideoPlayer>, settings: &QuizSettings) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            session: Arc::new(Mutex::new(Session::new(settings))),
            player,
            events,
            settle_delay: Duration::from_millis(settings.settle_delay_ms),
            quality: settings.player.quality,
        }
    }

    /// Replace the random source, for reproducible shuffles
    pub fn with_rng(self, rng: StdRng) -> Self {
        self.session.lock().rng = rng;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QuizEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: QuizEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn pause_player(&self) {
        if let Err(e) = self.player.pause() {
            warn!("Failed to pause player: {}", e);
        }
    }

    pub fn snapshot(&self) -> QuizSnapshot {
        self.session.lock().snapshot()
    }

    /// Every canonical song of the current collection
    pub fn songs(&self) -> Vec<Song> {
        self.session.lock().library.songs().to_vec()
    }

    /// Build a library from freshly imported records and make it current
    pub fn apply_songs(&self, raw: &[RawSong]) -> QuizSnapshot {
        let library = {
            let mut session = self.session.lock();
            let shuffle_all = session.shuffle_all;
            SongLibrary::from_raw(raw, shuffle_all, &mut session.rng)
        };
        self.replace_library(library)
    }

    /// Swap in a new collection and reset cursor, round and score
    pub fn replace_library(&self, library: SongLibrary) -> QuizSnapshot {
        let (was_playing, event, snapshot) = {
            let mut session = self.session.lock();
            let was_playing = session.interrupt_playback();

            session.library = library;
            session.cursor = None;
            session.round = 0;
            session.score = 0;
            session.answer = None;
            session.feedback.clear();

            info!(
                "Loaded {} songs ({} playable)",
                session.library.songs().len(),
                session.library.playable().len()
            );
            let event = QuizEvent::LibraryLoaded {
                songs: session.library.songs().len(),
                playable: session.library.playable().len(),
            };
            (was_playing, event, session.snapshot())
        };

        if was_playing {
            self.pause_player();
        }
        self.emit(event);
        snapshot
    }

    /// The embedded player finished loading; the start button becomes usable
    pub fn mark_player_ready(&self) -> QuizSnapshot {
        let mut session = self.session.lock();
        session.player_ready = true;
        session.snapshot()
    }

    /// Unlock audio after a user gesture, and begin round 1 if nothing is running
    pub fn start(&self) -> Result<QuizSnapshot> {
        let (event, snapshot) = {
            let mut session = self.session.lock();
            if !session.player_ready {
                return Err(QuizError::PlayerNotReady);
            }
            if session.audio_unlocked {
                return Ok(session.snapshot());
            }

            session.audio_unlocked = true;
            info!("Audio unlocked");

            let event = if session.cursor.is_none() {
                session.advance()
            } else {
                None
            };
            (event, session.snapshot())
        };

        if let Some(event) = event {
            self.emit(event);
        }
        Ok(snapshot)
    }

    /// Advance to the next playable song, wrapping after the last one
    pub fn next_round(&self) -> QuizSnapshot {
        let (was_playing, event, snapshot) = {
            let mut session = self.session.lock();
            if session.library.playable().is_empty() {
                return session.snapshot();
            }

            let was_playing = session.interrupt_playback();
            let event = session.advance();
            (was_playing, event, session.snapshot())
        };

        if was_playing {
            self.pause_player();
        }
        if let Some(event) = event {
            self.emit(event);
        }
        snapshot
    }

    /// Play a snippet of the current song
    pub async fn play(&self) -> QuizSnapshot {
        let token = {
            let mut session = self.session.lock();
            if !session.audio_unlocked || session.playing || session.current_song().is_none() {
                return session.snapshot();
            }

            session.interrupt_playback();
            session.playing = true;
            session.play_token
        };

        // Give the player a moment to settle before querying it
        tokio::time::sleep(self.settle_delay).await;

        let (song, snippet_seconds) = {
            let mut session = self.session.lock();
            if session.play_token != token {
                debug!("Play superseded during settle delay");
                return session.snapshot();
            }
            let song = session.current_song().cloned();
            match song {
                Some(song) => (song, session.snippet_seconds),
                None => {
                    session.playing = false;
                    return session.snapshot();
                }
            }
        };

        match self.start_snippet(&song, snippet_seconds) {
            Ok(start_seconds) => {
                if !self.arm_stop_timer(token, snippet_seconds) {
                    // Superseded while driving the player, so no timer will stop it
                    debug!("Play superseded while starting the snippet");
                    self.pause_player();
                    return self.snapshot();
                }
                self.emit(QuizEvent::SnippetStarted {
                    video_id: song.video_id.clone(),
                    start_seconds,
                    snippet_seconds,
                });
            }
            Err(e) => {
                error!("Failed to play snippet of {}: {}", song.video_id, e);
                {
                    let mut session = self.session.lock();
                    if session.play_token == token {
                        session.playing = false;
                    }
                }
                self.emit(QuizEvent::PlaybackFailed {
                    message: e.to_string(),
                });
            }
        }

        self.snapshot()
    }

    /// Same as `play`: restart the current song's snippet
    pub async fn replay(&self) -> QuizSnapshot {
        self.play().await
    }

    fn start_snippet(&self, song: &Song, snippet_seconds: u32) -> std::result::Result<u64, PlayerError> {
        let duration = self.player.duration();
        let start_seconds = {
            let mut session = self.session.lock();
            snippet_offset(duration, snippet_seconds, &mut session.rng)
        };

        debug!(
            "Snippet of {} from {}s for {}s (duration {}s)",
            song.video_id, start_seconds, snippet_seconds, duration
        );

        self.player.load_video(&song.video_id, start_seconds, self.quality)?;
        self.player.unmute()?;
        self.player.play()?;

        Ok(start_seconds)
    }

    /// Returns false when the play was superseded and no timer was kept
    fn arm_stop_timer(&self, token: u64, snippet_seconds: u32) -> bool {
        let session = Arc::clone(&self.session);
        let player = Arc::clone(&self.player);
        let events = self.events.clone();

        let timer = StopTimer::arm(Duration::from_secs(u64::from(snippet_seconds)), move || {
            let current = {
                let mut session = session.lock();
                if session.play_token == token {
                    session.playing = false;
                    // This is the running timer; taking it only drops the handle
                    session.stop_timer.take();
                    true
                } else {
                    false
                }
            };

            if current {
                if let Err(e) = player.pause() {
                    warn!("Failed to pause player: {}", e);
                }
                let _ = events.send(QuizEvent::SnippetStopped);
            }
        });

        let mut session = self.session.lock();
        if session.play_token == token {
            if let Some(previous) = session.stop_timer.replace(timer) {
                previous.cancel();
            }
            true
        } else {
            timer.cancel();
            false
        }
    }

    /// Take the round's one answer
    pub fn answer(&self, choice: &str) -> Result<QuizSnapshot> {
        let (event, snapshot) = {
            let mut session = self.session.lock();
            let song = session.current_song().cloned().ok_or(QuizError::NoActiveRound)?;
            if session.answer.is_some() {
                return Err(QuizError::AlreadyAnswered);
            }
            if !song.choices.iter().any(|c| c == choice) {
                return Err(QuizError::UnknownChoice(choice.to_string()));
            }

            let expected = if song.correct.is_empty() {
                song.title.clone()
            } else {
                song.correct.clone()
            };
            let correct = choice == expected;

            if correct {
                session.score += 1;
                session.feedback = FEEDBACK_CORRECT.to_string();
            } else {
                session.feedback = format!("Wrong. Answer: {}", expected);
            }
            info!("Answered {:?} ({})", choice, if correct { "correct" } else { "wrong" });

            session.answer = Some(AnswerOutcome {
                choice: choice.to_string(),
                correct,
                expected,
            });

            let event = QuizEvent::Answered {
                choice: choice.to_string(),
                correct,
                score: session.score,
            };
            (event, session.snapshot())
        };

        self.emit(event);
        Ok(snapshot)
    }

    /// Change the snippet length; takes effect on the next play
    pub fn set_snippet_seconds(&self, seconds: u32) -> QuizSnapshot {
        let mut session = self.session.lock();
        session.snippet_seconds = sanitize_snippet_seconds(seconds);
        session.snapshot()
    }

    /// Toggle shuffling of the playable list; takes effect on the next import
    pub fn set_shuffle_all(&self, shuffle_all: bool) -> QuizSnapshot {
        let mut session = self.session.lock();
        session.shuffle_all = shuffle_all;
        session.snapshot()
    }
}
