//! Server error types

use thiserror::Error;

/// Delivery server errors
#[derive(Debug, Error)]
pub enum ServerError {
    /// Could not bind the listen socket
    #[error("cannot bind delivery endpoint on port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// Serving failed after startup
    #[error("delivery endpoint stopped: {0}")]
    Serve(#[from] std::io::Error),
}
