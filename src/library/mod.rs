// Song library module
// Normalizes imported records, completes answer sets and picks the playable subset

pub mod choices;
pub mod models;
pub mod normalizer;
pub mod playable;

pub use models::{RawSong, Song};

use rand::Rng;
use serde::Serialize;

/// The working song collection together with its playable subset.
///
/// Both lists are only ever built together, so they cannot drift apart.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SongLibrary {
    songs: Vec<Song>,
    playable: Vec<Song>,
}

impl SongLibrary {
    /// Normalize, complete choices and filter a freshly imported batch
    pub fn from_raw<R: Rng + ?Sized>(raw: &[RawSong], shuffle_all: bool, rng: &mut R) -> Self {
        let mut songs = normalizer::normalize_songs(raw);
        choices::ensure_choices(&mut songs, rng);
        let playable = playable::filter_playable(&songs, shuffle_all, rng);

        Self { songs, playable }
    }

    /// Every canonical record, in import order
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Records the quiz can actually play
    pub fn playable(&self) -> &[Song] {
        &self.playable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    #[test]
    fn test_library_from_json_scenario() {
        let mut rng = StdRng::seed_from_u64(2);
        let raw: Vec<RawSong> = [
            json!({ "title": "A", "youtubeUrl": "https://youtu.be/XXXXXXXXXXX" }),
            json!({ "title": "B", "videoId": "YYYYYYYYYYY" }),
        ]
        .iter()
        .map(RawSong::from)
        .collect();

        let library = SongLibrary::from_raw(&raw, false, &mut rng);

        assert_eq!(library.songs().len(), 2);
        assert_eq!(library.playable().len(), 2);
        for song in library.playable() {
            assert_eq!(song.choices.len(), 2);
            assert!(song.choices.contains(&song.title));
        }
        assert_eq!(library.playable()[0].video_id, "XXXXXXXXXXX");
        assert_eq!(
            library.playable()[1].source_url,
            "https://www.youtube.com/watch?v=YYYYYYYYYYY"
        );
    }

    #[test]
    fn test_library_excludes_unplayable() {
        let mut rng = StdRng::seed_from_u64(2);
        let raw: Vec<RawSong> = [
            json!({ "title": "A", "videoId": "abc123" }),
            json!({ "title": "B", "videoId": "ab" }),
            json!({ "title": "C" }),
        ]
        .iter()
        .map(RawSong::from)
        .collect();

        let library = SongLibrary::from_raw(&raw, false, &mut rng);

        assert_eq!(library.songs().len(), 3);
        assert_eq!(library.playable().len(), 1);
        assert_eq!(library.playable()[0].title, "A");
    }
}
