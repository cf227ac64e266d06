//! KafkaPublisher - rdkafka FutureProducer wrapper
//!
//! Single-partition semantics: every message carries the raw record payload,
//! no key and no partition logic. Broker-side topic administration is out of
//! scope; the topic must already exist (or auto-creation be enabled).

use std::time::Duration;

use contracts::{BrokerConfig, ContractError, Record, StreamPublisher};
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use tracing::{debug, instrument};

/// Publisher backed by an rdkafka [`FutureProducer`].
pub struct KafkaPublisher {
    name: String,
    topic: String,
    message_timeout: Duration,
    producer: FutureProducer,
}

impl KafkaPublisher {
    /// Build a producer from broker configuration.
    ///
    /// # Errors
    /// [`ContractError::PublisherConnection`] when the producer cannot be
    /// created (invalid address, librdkafka config error).
    #[instrument(name = "kafka_publisher_from_config", skip(config), fields(address = %config.address, topic = %config.topic))]
    pub fn from_config(config: &BrokerConfig) -> Result<Self, ContractError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.address)
            .set("message.timeout.ms", config.message_timeout_ms.to_string())
            .create()
            .map_err(|e| ContractError::publisher_connection("kafka", e.to_string()))?;

        debug!(address = %config.address, topic = %config.topic, "Kafka producer created");

        Ok(Self {
            name: "kafka".to_string(),
            topic: config.topic.clone(),
            message_timeout: Duration::from_millis(config.message_timeout_ms),
            producer,
        })
    }
}

impl StreamPublisher for KafkaPublisher {
    fn name(&self) -> &str {
        &self.name
    }

    /// Send one message per record, awaiting each acknowledgement before the
    /// next send so broker order matches batch order.
    async fn publish(&mut self, records: &[Record]) -> Result<(), ContractError> {
        for record in records {
            let message = FutureRecord::<(), _>::to(&self.topic).payload(&record.payload[..]);
            self.producer
                .send(message, Timeout::After(self.message_timeout))
                .await
                .map_err(|(e, _)| ContractError::publisher_write(&self.name, e.to_string()))?;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ContractError> {
        self.producer
            .flush(Timeout::After(self.message_timeout))
            .map_err(|e| ContractError::publisher_write(&self.name, e.to_string()))
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        // rdkafka flushes and tears down on drop
        Ok(())
    }
}
