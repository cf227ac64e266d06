//! Relay run statistics.

use std::time::Duration;

/// Statistics from one relay run
#[derive(Debug, Clone, Default)]
pub struct RelayStats {
    /// Loop iterations completed
    pub iterations: u64,

    /// Non-empty batches forwarded to the broker
    pub batches_published: u64,

    /// Total records forwarded
    pub records_published: u64,

    /// Retries performed across fetch and publish
    pub retries: u64,

    /// Actual wall-clock duration of the run
    pub duration: Duration,

    /// Whether the run ended on an external shutdown signal rather than by
    /// exhausting its run-length budget
    pub cancelled: bool,
}

impl RelayStats {
    /// Records forwarded per wall-clock second
    pub fn records_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.records_published as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}
