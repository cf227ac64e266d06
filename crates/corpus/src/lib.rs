//! # Corpus
//!
//! Corpus construction: scan a directory for files matching a glob pattern,
//! parse each as a JSON array of objects, and flatten into the ordered,
//! immutable record sequence the pacer serves.
//!
//! Failures here are fatal by design: a process that cannot load its corpus
//! has nothing to serve.

mod error;
mod loader;

pub use error::CorpusError;
pub use loader::CorpusLoader;
