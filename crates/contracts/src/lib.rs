//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Wall-clock time (`std::time::SystemTime`) drives the release schedule
//! - Records carry no timestamps of their own; ordering is purely positional

mod blueprint;
mod error;
mod publisher;
mod record;
mod wire;

pub use blueprint::*;
pub use error::*;
pub use publisher::*;
pub use record::*;
pub use wire::{decode_batch, encode_batch, WIRE_VERSION};
