//! # Relay
//!
//! Polls the delivery endpoint at a configured cadence and forwards newly
//! released records to a broker publisher, one message per record, in order.
//!
//! The loop is single-threaded and strictly sequential: at most one
//! fetch/publish cycle is in flight at a time. The sleep between iterations
//! self-corrects for processing latency but never goes negative; when an
//! iteration overruns the cadence, the next one starts immediately instead
//! of bursting catch-up requests.

mod cadence;
mod client;
mod error;
mod publishers;
mod relay;
mod stats;

pub use client::EndpointClient;
pub use error::RelayError;
pub use publishers::MemoryPublisher;
#[cfg(feature = "real-kafka")]
pub use publishers::KafkaPublisher;
pub use relay::RelayLoop;
pub use stats::RelayStats;
