//! Relay loop - poll, batch, publish, sleep.

use std::time::{Duration, Instant};

use contracts::{FailurePolicy, Record, RelayConfig, StreamPublisher};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::cadence::sleep_interval;
use crate::{EndpointClient, RelayError, RelayStats};

/// The polling relay.
///
/// Strictly sequential: one fetch/publish cycle at a time. The run-length
/// budget advances by the configured frequency per iteration, not by wall
/// time, so a slow iteration consumes exactly one budget slot.
pub struct RelayLoop<P: StreamPublisher> {
    client: EndpointClient,
    publisher: P,
    config: RelayConfig,
}

impl<P: StreamPublisher> RelayLoop<P> {
    /// Build a relay from configuration and a publisher.
    ///
    /// # Errors
    /// [`RelayError::ClientBuild`] when the HTTP client cannot be built.
    pub fn new(config: RelayConfig, publisher: P) -> Result<Self, RelayError> {
        let client = EndpointClient::new(config.endpoint.clone())?;
        Ok(Self {
            client,
            publisher,
            config,
        })
    }

    /// Run to budget exhaustion, fatal failure, or shutdown.
    ///
    /// Cancellation is observed before each iteration, during the fetch, and
    /// during the cadence sleep. Once a window has been fetched it is always
    /// published before the loop exits; a batch is never dropped mid-flight.
    #[instrument(name = "relay_run", skip(self, shutdown), fields(endpoint = %self.client.url()))]
    pub async fn run(mut self, shutdown: CancellationToken) -> Result<RelayStats, RelayError> {
        let frequency = self.config.frequency();
        let total = self.config.run_length();
        let mut budget = Duration::ZERO;
        let mut stats = RelayStats::default();
        let started = Instant::now();

        info!(
            frequency_secs = frequency.as_secs(),
            run_length_secs = total.as_secs(),
            policy = ?self.config.failure_policy,
            "relay starting"
        );

        while budget < total {
            if shutdown.is_cancelled() {
                stats.cancelled = true;
                break;
            }

            let iter_start = Instant::now();

            let records = tokio::select! {
                fetched = self.fetch_with_policy(&mut stats) => fetched?,
                () = shutdown.cancelled() => {
                    stats.cancelled = true;
                    break;
                }
            };

            if !records.is_empty() {
                // Point of no return: the window is out of the pacer, so it
                // must reach the broker even if shutdown fires meanwhile.
                self.publish_with_policy(&records, &mut stats).await?;
                stats.batches_published += 1;
                stats.records_published += records.len() as u64;
                metrics::counter!("relay_records_published").increment(records.len() as u64);
                info!(
                    took_ms = iter_start.elapsed().as_millis() as u64,
                    records = records.len(),
                    "batch forwarded"
                );
            }

            stats.iterations += 1;
            budget += frequency;

            let sleep_for = sleep_interval(frequency, iter_start.elapsed());
            if !sleep_for.is_zero() && budget < total {
                tokio::select! {
                    () = tokio::time::sleep(sleep_for) => {}
                    () = shutdown.cancelled() => {
                        stats.cancelled = true;
                        break;
                    }
                }
            }
        }

        self.publisher.flush().await.map_err(RelayError::Publish)?;
        self.publisher.close().await.map_err(RelayError::Publish)?;

        stats.duration = started.elapsed();
        info!(
            iterations = stats.iterations,
            records = stats.records_published,
            cancelled = stats.cancelled,
            "relay finished"
        );
        Ok(stats)
    }

    /// Fetch one window, applying the configured failure policy.
    async fn fetch_with_policy(&self, stats: &mut RelayStats) -> Result<Vec<Record>, RelayError> {
        let mut attempt: u32 = 1;
        let mut backoff = self.config.initial_backoff();

        loop {
            match self.client.fetch().await {
                Ok(records) => return Ok(records),
                Err(e) => {
                    self.check_retryable("fetch", e, &mut attempt, &mut backoff, stats)
                        .await?;
                }
            }
        }
    }

    /// Publish one batch, applying the configured failure policy.
    ///
    /// Retries re-publish the whole batch; delivery guarantees to the broker
    /// are explicitly out of scope, so duplicates on retry are acceptable.
    async fn publish_with_policy(
        &mut self,
        records: &[Record],
        stats: &mut RelayStats,
    ) -> Result<(), RelayError> {
        let mut attempt: u32 = 1;
        let mut backoff = self.config.initial_backoff();

        loop {
            match self.publisher.publish(records).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    let e = RelayError::Publish(e);
                    self.check_retryable("publish", e, &mut attempt, &mut backoff, stats)
                        .await?;
                }
            }
        }
    }

    /// Decide whether to retry `error`; sleeps the backoff when retrying.
    async fn check_retryable(
        &self,
        operation: &'static str,
        error: RelayError,
        attempt: &mut u32,
        backoff: &mut Duration,
        stats: &mut RelayStats,
    ) -> Result<(), RelayError> {
        if self.config.failure_policy == FailurePolicy::FailFast || !error.is_transient() {
            return Err(error);
        }
        if *attempt >= self.config.max_attempts {
            return Err(RelayError::RetriesExhausted {
                operation,
                attempts: *attempt,
                source: Box::new(error),
            });
        }

        warn!(
            operation,
            attempt = *attempt,
            backoff_ms = backoff.as_millis() as u64,
            error = %error,
            "transient failure, retrying"
        );
        metrics::counter!("relay_retries").increment(1);
        stats.retries += 1;

        tokio::time::sleep(*backoff).await;
        *backoff *= 2;
        *attempt += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::routing::get;
    use axum::Router;

    use crate::MemoryPublisher;

    use super::*;

    type Responses = Arc<Mutex<VecDeque<&'static str>>>;

    /// Stub delivery endpoint that serves scripted bodies, then `[]`.
    async fn start_stub(bodies: &[&'static str]) -> String {
        let responses: Responses = Arc::new(Mutex::new(bodies.iter().copied().collect()));
        let app = Router::new()
            .route(
                "/v1/next",
                get(|State(responses): State<Responses>| async move {
                    responses.lock().unwrap().pop_front().unwrap_or("[]")
                }),
            )
            .with_state(responses);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1/next")
    }

    fn config(endpoint: String, run_secs: u64) -> RelayConfig {
        RelayConfig {
            endpoint,
            frequency_secs: 1,
            run_length_secs: run_secs,
            ..RelayConfig::default()
        }
    }

    fn published_payloads(captured: &Arc<Mutex<Vec<Record>>>) -> Vec<String> {
        captured
            .lock()
            .unwrap()
            .iter()
            .map(|r| String::from_utf8(r.payload.to_vec()).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_forwards_batches_in_order() {
        let endpoint = start_stub(&["[{\"a\":1},{\"b\":2}]", "[{\"c\":3}]"]).await;
        let publisher = MemoryPublisher::new("mem");
        let captured = publisher.captured();

        let relay = RelayLoop::new(config(endpoint, 2), publisher).unwrap();
        let stats = relay.run(CancellationToken::new()).await.unwrap();

        assert_eq!(stats.iterations, 2);
        assert_eq!(stats.batches_published, 2);
        assert_eq!(stats.records_published, 3);
        assert_eq!(
            published_payloads(&captured),
            vec!["{\"a\":1}", "{\"b\":2}", "{\"c\":3}"]
        );
    }

    #[tokio::test]
    async fn test_empty_windows_publish_nothing() {
        let endpoint = start_stub(&["[]"]).await;
        let publisher = MemoryPublisher::new("mem");
        let captured = publisher.captured();

        let relay = RelayLoop::new(config(endpoint, 1), publisher).unwrap();
        let stats = relay.run(CancellationToken::new()).await.unwrap();

        assert_eq!(stats.iterations, 1);
        assert_eq!(stats.batches_published, 0);
        assert!(published_payloads(&captured).is_empty());
    }

    #[tokio::test]
    async fn test_fail_fast_aborts_on_unreachable_endpoint() {
        // Nothing listens on this port
        let cfg = config("http://127.0.0.1:1/v1/next".to_string(), 10);
        let relay = RelayLoop::new(cfg, MemoryPublisher::new("mem")).unwrap();

        let err = relay.run(CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, RelayError::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_retry_exhaustion_is_fatal() {
        let cfg = RelayConfig {
            endpoint: "http://127.0.0.1:1/v1/next".to_string(),
            frequency_secs: 1,
            run_length_secs: 10,
            failure_policy: FailurePolicy::Retry,
            max_attempts: 2,
            initial_backoff_ms: 5,
            ..RelayConfig::default()
        };
        let relay = RelayLoop::new(cfg, MemoryPublisher::new("mem")).unwrap();

        let err = relay.run(CancellationToken::new()).await.unwrap_err();
        assert!(matches!(
            err,
            RelayError::RetriesExhausted {
                operation: "fetch",
                attempts: 2,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_retry_survives_transient_publish_failure() {
        let endpoint = start_stub(&["[{\"a\":1}]"]).await;
        let publisher = MemoryPublisher::new("mem").with_transient_failures(1);
        let captured = publisher.captured();

        let cfg = RelayConfig {
            endpoint,
            frequency_secs: 1,
            run_length_secs: 1,
            failure_policy: FailurePolicy::Retry,
            max_attempts: 3,
            initial_backoff_ms: 5,
            ..RelayConfig::default()
        };
        let relay = RelayLoop::new(cfg, publisher).unwrap();
        let stats = relay.run(CancellationToken::new()).await.unwrap();

        assert_eq!(stats.retries, 1);
        assert_eq!(published_payloads(&captured), vec!["{\"a\":1}"]);
    }

    #[tokio::test]
    async fn test_fail_fast_aborts_on_publish_failure() {
        let endpoint = start_stub(&["[{\"a\":1}]"]).await;
        let publisher = MemoryPublisher::new("mem").with_transient_failures(1);

        let relay = RelayLoop::new(config(endpoint, 5), publisher).unwrap();
        let err = relay.run(CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, RelayError::Publish(_)));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_fatal_even_under_retry() {
        let endpoint = start_stub(&["not json at all"]).await;
        let cfg = RelayConfig {
            endpoint,
            frequency_secs: 1,
            run_length_secs: 5,
            failure_policy: FailurePolicy::Retry,
            max_attempts: 5,
            initial_backoff_ms: 5,
            ..RelayConfig::default()
        };
        let relay = RelayLoop::new(cfg, MemoryPublisher::new("mem")).unwrap();

        let err = relay.run(CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, RelayError::Decode(_)));
    }

    #[tokio::test]
    async fn test_shutdown_stops_promptly() {
        let endpoint = start_stub(&[]).await;
        let relay = RelayLoop::new(config(endpoint, 3600), MemoryPublisher::new("mem")).unwrap();

        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            token.cancel();
        });

        let started = Instant::now();
        let stats = relay.run(shutdown).await.unwrap();
        assert!(stats.cancelled);
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
