//! # Pacer
//!
//! Maps elapsed wall-clock time to the next unreleased window of the corpus.
//!
//! Responsibilities:
//! - Own the corpus and the sole mutable release cursor
//! - Compute, per call, which prefix of the corpus should be visible by now
//! - Guarantee monotonic, disjoint, gap-free windows under concurrent callers

mod error;
mod release;

pub use error::PacerError;
pub use release::{Pacer, PacerSnapshot};
