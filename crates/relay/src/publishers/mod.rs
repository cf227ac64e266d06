//! Broker publisher implementations.

#[cfg(feature = "real-kafka")]
mod kafka;
mod memory;

#[cfg(feature = "real-kafka")]
pub use kafka::KafkaPublisher;
pub use memory::MemoryPublisher;
