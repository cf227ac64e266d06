//! Pacer error types

use thiserror::Error;

/// Pacer construction errors.
///
/// `release_next` itself never fails: out-of-window calls return an empty
/// batch by design.
#[derive(Debug, Error)]
pub enum PacerError {
    /// A zero run length would make the release rate undefined
    #[error("run_length must be > 0")]
    ZeroRunLength,
}
