//! Corpus loading error types

use thiserror::Error;

/// Corpus loading errors; all are fatal at startup
#[derive(Debug, Error)]
pub enum CorpusError {
    /// Corpus directory could not be read
    #[error("cannot read corpus directory '{dir}': {source}")]
    DirUnreadable {
        dir: String,
        #[source]
        source: std::io::Error,
    },

    /// The glob pattern is not valid
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A matching file could not be read
    #[error("cannot read corpus file '{file}': {source}")]
    FileUnreadable {
        file: String,
        #[source]
        source: std::io::Error,
    },

    /// A matching file was not a JSON array of objects
    #[error("malformed corpus file '{file}': {message}")]
    MalformedFile { file: String, message: String },
}
