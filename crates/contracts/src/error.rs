//! Layered error definitions
//!
//! Categorized by source: config / corpus / pacer / endpoint / publisher

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Corpus Errors =====
    /// Corpus file could not be parsed
    #[error("corpus parse error in '{file}': {message}")]
    CorpusParse { file: String, message: String },

    // ===== Wire Errors =====
    /// Delivery endpoint response body was not valid wire format
    #[error("wire decode error: {message}")]
    WireDecode { message: String },

    // ===== Publisher Errors =====
    /// Publisher write error
    #[error("publisher '{publisher_name}' write error: {message}")]
    PublisherWrite {
        publisher_name: String,
        message: String,
    },

    /// Publisher connection error
    #[error("publisher '{publisher_name}' connection error: {message}")]
    PublisherConnection {
        publisher_name: String,
        message: String,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create corpus parse error
    pub fn corpus_parse(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CorpusParse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create wire decode error
    pub fn wire_decode(message: impl Into<String>) -> Self {
        Self::WireDecode {
            message: message.into(),
        }
    }

    /// Create publisher write error
    pub fn publisher_write(publisher_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PublisherWrite {
            publisher_name: publisher_name.into(),
            message: message.into(),
        }
    }

    /// Create publisher connection error
    pub fn publisher_connection(
        publisher_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::PublisherConnection {
            publisher_name: publisher_name.into(),
            message: message.into(),
        }
    }
}
