// Snippet timing: random start offsets and the one-shot stop timer
use rand::Rng;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Pick where a snippet starts inside a video of `duration_secs`.
///
/// Long enough videos get a uniform offset in `[1, D - snippet - 1]` so the
/// snippet never runs into the very start or end; anything shorter (or an
/// unknown duration of 0) starts at the beginning.
pub fn snippet_offset<R: Rng + ?Sized>(duration_secs: f64, snippet_secs: u32, rng: &mut R) -> u64 {
    let duration = if duration_secs.is_finite() && duration_secs > 0.0 {
        duration_secs.floor() as u64
    } else {
        0
    };
    let snippet = u64::from(snippet_secs);

    if duration > snippet + 2 {
        rng.gen_range(1..=duration - snippet - 1)
    } else {
        0
    }
}

/// Handle to a pending "stop the snippet" task.
///
/// Dropping or cancelling the handle aborts the task, so replacing the one
/// stored handle is enough to guarantee a single pending timer.
#[derive(Debug)]
pub struct StopTimer {
    handle: JoinHandle<()>,
}

impl StopTimer {
    /// Run `on_fire` once after `after` elapses. Must be called inside a tokio runtime.
    pub fn arm<F>(after: Duration, on_fire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            on_fire();
        });

        Self { handle }
    }

    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for StopTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_offset_within_bounds() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen_low = false;
        let mut seen_high = false;

        for _ in 0..5000 {
            let offset = snippet_offset(100.0, 12, &mut rng);
            assert!((1..=87).contains(&offset), "offset {} out of range", offset);
            seen_low |= offset == 1;
            seen_high |= offset == 87;
        }

        assert!(seen_low && seen_high);
    }

    #[test]
    fn test_short_video_starts_at_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(snippet_offset(10.0, 12, &mut rng), 0);
        }
        // exactly snippet + 2 is still too short
        assert_eq!(snippet_offset(14.0, 12, &mut rng), 0);
    }

    #[test]
    fn test_unknown_duration_starts_at_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(snippet_offset(0.0, 12, &mut rng), 0);
        assert_eq!(snippet_offset(f64::NAN, 12, &mut rng), 0);
        assert_eq!(snippet_offset(-5.0, 12, &mut rng), 0);
    }

    #[test]
    fn test_fractional_duration_is_floored() {
        let mut rng = StdRng::seed_from_u64(1);
        // floor(15.9) = 15 leaves offsets 1..=2
        for _ in 0..50 {
            let offset = snippet_offset(15.9, 12, &mut rng);
            assert!((1..=2).contains(&offset), "offset {} out of range", offset);
        }
        // floor(14.9) = 14 is too short
        assert_eq!(snippet_offset(14.9, 12, &mut rng), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_once() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);

        let _timer = StopTimer::arm(Duration::from_secs(12), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_never_fires() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);

        let timer = StopTimer::arm(Duration::from_secs(5), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        timer.cancel();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
