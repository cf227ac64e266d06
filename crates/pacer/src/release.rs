//! Time-windowed release computation.

use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use contracts::{Batch, ClampPolicy, Corpus};
use tracing::{debug, instrument};

use crate::PacerError;

/// Stateful mapping from wall-clock time to unreleased corpus windows.
///
/// Owns the corpus and the sole mutable release cursor. The cursor only ever
/// advances; every call sequence observes pairwise-disjoint windows whose
/// concatenation is a prefix of the corpus.
pub struct Pacer {
    corpus: Corpus,
    start_time: SystemTime,
    run_length: Duration,
    clamp_policy: ClampPolicy,
    /// Guards the read-compute-write of the cursor so concurrent endpoint
    /// callers never skip or duplicate a window.
    cursor: Mutex<usize>,
}

/// Read-only view of pacer progress, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacerSnapshot {
    /// Records released so far (current cursor)
    pub released: usize,
    /// Corpus size
    pub total: usize,
    /// Whole seconds since the release window opened
    pub elapsed_secs: u64,
    /// Configured window length in seconds
    pub run_length_secs: u64,
}

impl Pacer {
    /// Create a pacer whose release window opens now.
    ///
    /// # Errors
    /// [`PacerError::ZeroRunLength`] when `run_length` is zero; the release
    /// rate would be undefined, so this fails at construction rather than
    /// per call.
    pub fn new(
        corpus: Corpus,
        run_length: Duration,
        clamp_policy: ClampPolicy,
    ) -> Result<Self, PacerError> {
        Self::with_start_time(corpus, run_length, clamp_policy, SystemTime::now())
    }

    /// Create a pacer with an explicit window start, for tests and replays.
    pub fn with_start_time(
        corpus: Corpus,
        run_length: Duration,
        clamp_policy: ClampPolicy,
        start_time: SystemTime,
    ) -> Result<Self, PacerError> {
        if run_length.is_zero() {
            return Err(PacerError::ZeroRunLength);
        }
        Ok(Self {
            corpus,
            start_time,
            run_length,
            clamp_policy,
            cursor: Mutex::new(0),
        })
    }

    /// Release the next window against the system clock.
    pub fn release_next(&self) -> Batch {
        self.release_next_at(SystemTime::now())
    }

    /// Release the next window as of `now`.
    ///
    /// Never fails: before the window opens, after it closes, or when the
    /// schedule has not yet reached the next record, the batch is empty.
    /// A `now` earlier than a previous call cannot move the cursor backwards.
    #[instrument(name = "pacer_release_next", skip(self, now))]
    pub fn release_next_at(&self, now: SystemTime) -> Batch {
        let mut cursor = self
            .cursor
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let elapsed = now
            .duration_since(self.start_time)
            .unwrap_or(Duration::ZERO);
        let expected =
            elapsed.as_secs_f64() / self.run_length.as_secs_f64() * self.corpus.len() as f64;
        let cap = match self.clamp_policy {
            ClampPolicy::ExcludeFinal => self.corpus.len().saturating_sub(1),
            ClampPolicy::IncludeFinal => self.corpus.len(),
        };
        let target = expected.min(cap as f64).floor() as usize;

        if target <= *cursor || target == 0 {
            return Batch::empty();
        }

        let batch = self.corpus.slice(*cursor, target);
        debug!(
            from = *cursor,
            to = target,
            released = batch.len(),
            elapsed_secs = elapsed.as_secs(),
            "window released"
        );
        metrics::counter!("pacer_records_released").increment(batch.len() as u64);
        *cursor = target;

        batch
    }

    /// Current progress, read-only.
    pub fn snapshot(&self) -> PacerSnapshot {
        self.snapshot_at(SystemTime::now())
    }

    /// Progress as of `now`, read-only.
    pub fn snapshot_at(&self, now: SystemTime) -> PacerSnapshot {
        let released = *self
            .cursor
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        PacerSnapshot {
            released,
            total: self.corpus.len(),
            elapsed_secs: now
                .duration_since(self.start_time)
                .unwrap_or(Duration::ZERO)
                .as_secs(),
            run_length_secs: self.run_length.as_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Record;

    fn corpus(n: usize) -> Corpus {
        (0..n)
            .map(|i| Record::new(format!("{{\"i\":{i}}}").into_bytes()))
            .collect()
    }

    fn pacer(n: usize, run_secs: u64, policy: ClampPolicy) -> (Pacer, SystemTime) {
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let p = Pacer::with_start_time(corpus(n), Duration::from_secs(run_secs), policy, t0)
            .expect("valid pacer");
        (p, t0)
    }

    fn payloads(batch: &Batch) -> Vec<String> {
        batch
            .iter()
            .map(|r| String::from_utf8(r.payload.to_vec()).unwrap())
            .collect()
    }

    #[test]
    fn test_zero_run_length_rejected() {
        let err = Pacer::with_start_time(
            corpus(3),
            Duration::ZERO,
            ClampPolicy::ExcludeFinal,
            SystemTime::UNIX_EPOCH,
        );
        assert!(matches!(err, Err(PacerError::ZeroRunLength)));
    }

    #[test]
    fn test_midpoint_releases_first_half() {
        // N=10, run=100s: at +50s expected=5, window [0,5)
        let (p, t0) = pacer(10, 100, ClampPolicy::ExcludeFinal);
        let batch = p.release_next_at(t0 + Duration::from_secs(50));
        assert_eq!(batch.len(), 5);
        assert_eq!(payloads(&batch)[0], "{\"i\":0}");
        assert_eq!(payloads(&batch)[4], "{\"i\":4}");
    }

    #[test]
    fn test_exclude_final_clamps_at_len_minus_one() {
        // At +100s the target clamps to 9: window [5,9), index 9 never released
        let (p, t0) = pacer(10, 100, ClampPolicy::ExcludeFinal);
        assert_eq!(p.release_next_at(t0 + Duration::from_secs(50)).len(), 5);

        let tail = p.release_next_at(t0 + Duration::from_secs(100));
        assert_eq!(tail.len(), 4);
        assert_eq!(payloads(&tail)[3], "{\"i\":8}");

        // Far beyond the window, index 9 still never appears
        assert!(p
            .release_next_at(t0 + Duration::from_secs(10_000))
            .is_empty());
        assert_eq!(p.snapshot_at(t0).released, 9);
    }

    #[test]
    fn test_include_final_drains_whole_corpus() {
        let (p, t0) = pacer(10, 100, ClampPolicy::IncludeFinal);
        assert_eq!(p.release_next_at(t0 + Duration::from_secs(50)).len(), 5);

        let tail = p.release_next_at(t0 + Duration::from_secs(100));
        assert_eq!(tail.len(), 5);
        assert_eq!(payloads(&tail)[4], "{\"i\":9}");
        assert_eq!(p.snapshot_at(t0).released, 10);
    }

    #[test]
    fn test_before_start_is_empty() {
        let (p, t0) = pacer(10, 100, ClampPolicy::ExcludeFinal);
        assert!(p.release_next_at(t0 - Duration::from_secs(30)).is_empty());
        assert_eq!(p.snapshot_at(t0).released, 0);
    }

    #[test]
    fn test_same_now_twice_is_idempotent() {
        let (p, t0) = pacer(10, 100, ClampPolicy::ExcludeFinal);
        let now = t0 + Duration::from_secs(30);
        assert_eq!(p.release_next_at(now).len(), 3);
        assert!(p.release_next_at(now).is_empty());
    }

    #[test]
    fn test_backwards_clock_cannot_retreat_cursor() {
        let (p, t0) = pacer(10, 100, ClampPolicy::ExcludeFinal);
        assert_eq!(p.release_next_at(t0 + Duration::from_secs(60)).len(), 6);

        // Clock steps back: no release, cursor unchanged
        assert!(p.release_next_at(t0 + Duration::from_secs(20)).is_empty());
        assert_eq!(p.snapshot_at(t0).released, 6);

        // Then forward again: continues from the high-water mark
        let batch = p.release_next_at(t0 + Duration::from_secs(80));
        assert_eq!(payloads(&batch)[0], "{\"i\":6}");
    }

    #[test]
    fn test_increasing_sequence_yields_disjoint_prefix() {
        let (p, t0) = pacer(50, 100, ClampPolicy::IncludeFinal);
        let mut seen = Vec::new();
        for s in [7, 13, 13, 29, 55, 55, 90, 100, 130] {
            let batch = p.release_next_at(t0 + Duration::from_secs(s));
            seen.extend(payloads(&batch));
        }
        // Concatenation is exactly corpus[0..last_target), no gaps, no repeats
        let expected: Vec<String> = (0..50).map(|i| format!("{{\"i\":{i}}}")).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_empty_corpus_always_empty() {
        let (p, t0) = pacer(0, 100, ClampPolicy::ExcludeFinal);
        assert!(p.release_next_at(t0 + Duration::from_secs(50)).is_empty());
        assert!(p.release_next_at(t0 + Duration::from_secs(500)).is_empty());
    }

    #[test]
    fn test_single_record_exclude_final_never_releases() {
        let (p, t0) = pacer(1, 10, ClampPolicy::ExcludeFinal);
        assert!(p.release_next_at(t0 + Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn test_concurrent_callers_observe_disjoint_windows() {
        use std::sync::Arc;

        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let p = Arc::new(
            Pacer::with_start_time(
                corpus(1000),
                Duration::from_secs(100),
                ClampPolicy::IncludeFinal,
                t0,
            )
            .expect("valid pacer"),
        );

        let now = t0 + Duration::from_secs(100);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let p = Arc::clone(&p);
                std::thread::spawn(move || payloads(&p.release_next_at(now)))
            })
            .collect();

        let mut all: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        // Exactly one caller wins the whole window, the rest get nothing
        all.sort_by_key(|s| {
            s.trim_start_matches("{\"i\":")
                .trim_end_matches('}')
                .parse::<usize>()
                .unwrap()
        });
        let expected: Vec<String> = (0..1000).map(|i| format!("{{\"i\":{i}}}")).collect();
        assert_eq!(all, expected);
    }
}
