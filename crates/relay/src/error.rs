//! Relay error types

use contracts::ContractError;
use thiserror::Error;

/// Relay-specific errors.
///
/// Each variant names the operation that failed so the process can exit with
/// a diagnostic identifying it.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Endpoint fetch failed (transport error or non-2xx status)
    #[error("fetch from '{url}' failed: {message}")]
    Fetch { url: String, message: String },

    /// Endpoint response body was not valid wire format
    #[error("decode of endpoint response failed: {0}")]
    Decode(#[source] ContractError),

    /// Broker publish failed
    #[error("publish failed: {0}")]
    Publish(#[source] ContractError),

    /// Retry policy exhausted its attempt budget
    #[error("{operation} still failing after {attempts} attempts: {source}")]
    RetriesExhausted {
        operation: &'static str,
        attempts: u32,
        #[source]
        source: Box<RelayError>,
    },

    /// HTTP client could not be constructed
    #[error("cannot build endpoint client: {message}")]
    ClientBuild { message: String },
}

impl RelayError {
    /// Whether a retry policy may try this failure again.
    ///
    /// Transport-level fetch and publish failures are transient; a body that
    /// does not decode, or an exhausted retry budget, is a protocol-level
    /// failure and always fatal.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Publish(_))
    }
}
