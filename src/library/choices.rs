// Multiple-choice answer set generation
use rand::seq::SliceRandom;
use rand::Rng;

use super::models::Song;

/// Number of choices a complete answer set holds
pub const CHOICE_COUNT: usize = 4;

/// Number of wrong answers drawn for a generated set
const DISTRACTOR_COUNT: usize = CHOICE_COUNT - 1;

/// Make sure every titled song has a usable answer set.
///
/// Songs with fewer than four choices get their answer (the correct string,
/// or the title when that is empty) plus up to three other titles from the
/// batch. Songs with a full set that lacks the correct
/// answer get three of their own choices plus the correct one. Untitled
/// songs are left alone.
pub fn ensure_choices<R: Rng + ?Sized>(songs: &mut [Song], rng: &mut R) {
    let titles: Vec<String> = songs.iter().map(|s| s.title.clone()).collect();

    for song in songs.iter_mut() {
        if song.title.is_empty() {
            continue;
        }

        if song.choices.len() < CHOICE_COUNT {
            let answer = if song.correct.is_empty() {
                song.title.clone()
            } else {
                song.correct.clone()
            };

            let mut pool: Vec<&str> = Vec::new();
            for title in &titles {
                if title.is_empty() || *title == song.title || *title == answer {
                    continue;
                }
                if !pool.contains(&title.as_str()) {
                    pool.push(title);
                }
            }
            pool.shuffle(rng);
            pool.truncate(DISTRACTOR_COUNT);

            let mut choices = Vec::with_capacity(pool.len() + 1);
            choices.push(answer);
            choices.extend(pool.into_iter().map(str::to_string));
            choices.shuffle(rng);
            song.choices = choices;
        } else if !song.correct.is_empty() && !song.choices.contains(&song.correct) {
            let mut kept = song.choices.clone();
            kept.shuffle(rng);
            kept.truncate(DISTRACTOR_COUNT);
            kept.push(song.correct.clone());
            kept.shuffle(rng);
            song.choices = kept;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn song(title: &str, choices: &[&str], correct: &str) -> Song {
        Song {
            position: 1,
            title: title.to_string(),
            video_id: String::new(),
            source_url: String::new(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            correct: correct.to_string(),
        }
    }

    fn titled(titles: &[&str]) -> Vec<Song> {
        titles.iter().map(|t| song(t, &[], t)).collect()
    }

    #[test]
    fn test_generates_four_distinct_choices() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut songs = titled(&["A", "B", "C", "D", "E", "F"]);

        ensure_choices(&mut songs, &mut rng);

        for s in &songs {
            assert_eq!(s.choices.len(), CHOICE_COUNT);
            assert!(s.choices.contains(&s.title));
            let mut unique = s.choices.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), CHOICE_COUNT);
        }
    }

    #[test]
    fn test_small_batch_yields_short_set() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut songs = titled(&["Song A", "Song B"]);

        ensure_choices(&mut songs, &mut rng);

        assert_eq!(songs[0].choices.len(), 2);
        assert!(songs[0].choices.contains(&"Song A".to_string()));
        assert!(songs[0].choices.contains(&"Song B".to_string()));
        assert_eq!(songs[1].choices.len(), 2);
    }

    #[test]
    fn test_duplicate_titles_are_collapsed() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut songs = titled(&["A", "B", "B", "B", "C"]);

        ensure_choices(&mut songs, &mut rng);

        let mut sorted = songs[0].choices.clone();
        sorted.sort();
        assert_eq!(sorted, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_untitled_song_untouched() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut songs = titled(&["", "A", "B"]);
        songs[0].choices = vec!["x".to_string()];

        ensure_choices(&mut songs, &mut rng);

        assert_eq!(songs[0].choices, vec!["x"]);
        assert!(!songs[1].choices.contains(&String::new()));
    }

    #[test]
    fn test_generated_set_uses_correct_answer() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut songs = titled(&["A", "B", "C", "D"]);
        songs[0].correct = "Alpha".to_string();

        ensure_choices(&mut songs, &mut rng);

        assert!(songs[0].choices.contains(&"Alpha".to_string()));
        assert!(!songs[0].choices.contains(&"A".to_string()));
        assert_eq!(songs[0].choices.len(), CHOICE_COUNT);
    }

    #[test]
    fn test_full_set_missing_correct_is_rebuilt() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut songs = vec![song("Title", &["w", "x", "y", "z", "v"], "Right")];

        ensure_choices(&mut songs, &mut rng);

        assert_eq!(songs[0].choices.len(), CHOICE_COUNT);
        assert!(songs[0].choices.contains(&"Right".to_string()));
    }

    #[test]
    fn test_full_set_with_correct_kept_as_is() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut songs = vec![song("Title", &["w", "x", "Title", "z", "v"], "Title")];

        ensure_choices(&mut songs, &mut rng);

        assert_eq!(songs[0].choices, vec!["w", "x", "Title", "z", "v"]);
    }

    #[test]
    fn test_running_twice_keeps_correct() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut songs = titled(&["A", "B", "C", "D", "E"]);
        songs[2].correct = "Gamma".to_string();
        songs[2].choices = vec!["1", "2", "3", "4"].into_iter().map(String::from).collect();

        ensure_choices(&mut songs, &mut rng);
        ensure_choices(&mut songs, &mut rng);

        for s in &songs {
            assert!(s.choices.contains(&s.correct));
        }
    }
}
