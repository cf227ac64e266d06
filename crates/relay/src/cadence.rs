//! Cadence arithmetic for the poll loop.

use std::time::Duration;

/// Time left to sleep after an iteration that took `elapsed`.
///
/// Elapsed time is rounded up to whole milliseconds before subtracting, and
/// the result saturates at zero: an iteration that meets or exceeds the
/// cadence produces no sleep at all, never a negative one, and no catch-up
/// iterations are issued.
pub(crate) fn sleep_interval(frequency: Duration, elapsed: Duration) -> Duration {
    let elapsed_ms = elapsed.as_nanos().div_ceil(1_000_000);
    let elapsed_ceiled = Duration::from_millis(elapsed_ms.min(u128::from(u64::MAX)) as u64);
    frequency.saturating_sub(elapsed_ceiled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_iteration_sleeps_remainder() {
        let s = sleep_interval(Duration::from_secs(1), Duration::from_millis(100));
        assert_eq!(s, Duration::from_millis(900));
    }

    #[test]
    fn test_sub_millisecond_elapsed_rounds_up() {
        let s = sleep_interval(Duration::from_secs(1), Duration::from_micros(1));
        assert_eq!(s, Duration::from_millis(999));
    }

    #[test]
    fn test_zero_elapsed_sleeps_full_cadence() {
        let s = sleep_interval(Duration::from_secs(2), Duration::ZERO);
        assert_eq!(s, Duration::from_secs(2));
    }

    #[test]
    fn test_overrun_never_negative() {
        assert_eq!(
            sleep_interval(Duration::from_secs(1), Duration::from_secs(1)),
            Duration::ZERO
        );
        assert_eq!(
            sleep_interval(Duration::from_secs(1), Duration::from_secs(30)),
            Duration::ZERO
        );
    }

    #[test]
    fn test_exact_boundary_rounding() {
        // 999.2ms ceils to 1000ms: cadence fully consumed
        let s = sleep_interval(Duration::from_secs(1), Duration::from_micros(999_200));
        assert_eq!(s, Duration::ZERO);
    }
}
