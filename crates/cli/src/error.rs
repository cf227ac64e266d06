//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Selected broker backend is not compiled in
    #[error("Broker backend '{backend}' is not available: {message}")]
    BrokerUnavailable { backend: String, message: String },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    #[allow(dead_code)] // referenced only without the real-kafka feature
    pub fn broker_unavailable(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BrokerUnavailable {
            backend: backend.into(),
            message: message.into(),
        }
    }
}
