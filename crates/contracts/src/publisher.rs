//! StreamPublisher trait - Relay output interface
//!
//! Defines the abstract interface for broker publishers.

use crate::{ContractError, Record};

/// Broker publish trait
///
/// All publisher implementations must implement this trait. The target
/// stream/topic is part of publisher construction, not of each call.
#[trait_variant::make(StreamPublisher: Send)]
pub trait LocalStreamPublisher {
    /// Publisher name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Append a batch of opaque payloads to the configured stream.
    ///
    /// One message per record, in slice order, with an empty key.
    ///
    /// # Errors
    /// Returns a publish error when the broker is unreachable or rejects a
    /// message; the batch must not be considered delivered in that case.
    async fn publish(&mut self, records: &[Record]) -> Result<(), ContractError>;

    /// Flush buffered messages (if any)
    async fn flush(&mut self) -> Result<(), ContractError>;

    /// Close the publisher
    async fn close(&mut self) -> Result<(), ContractError>;
}
