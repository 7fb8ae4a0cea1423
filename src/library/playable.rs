// Playable filter
// Keeps the songs whose video id the player can load
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;

use super::models::Song;

/// Get the regex for syntactically plausible video ids
fn get_video_id_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{6,}$").unwrap())
}

/// Whether a video id looks like something the player can load
pub fn is_playable_id(video_id: &str) -> bool {
    get_video_id_regex().is_match(video_id)
}

/// Songs with a plausible video id, in input order unless `shuffle_all` is set
pub fn filter_playable<R: Rng + ?Sized>(songs: &[Song], shuffle_all: bool, rng: &mut R) -> Vec<Song> {
    let mut playable: Vec<Song> = songs
        .iter()
        .filter(|s| is_playable_id(&s.video_id))
        .cloned()
        .collect();

    if shuffle_all {
        playable.shuffle(rng);
    }

    playable
}
