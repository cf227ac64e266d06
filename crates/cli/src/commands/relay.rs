//! `relay` command implementation.

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::info;

use contracts::{BrokerKind, ReplayBlueprint};
use relay::{MemoryPublisher, RelayLoop, RelayStats};

use super::signal::spawn_shutdown_watcher;
use crate::cli::RelayArgs;
use crate::error::CliError;

/// Execute the `relay` command
pub async fn run_relay(args: &RelayArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    apply_overrides(&mut blueprint, args);

    info!(
        endpoint = %blueprint.relay.endpoint,
        frequency_secs = blueprint.relay.frequency_secs,
        run_length_secs = blueprint.relay.run_length_secs,
        broker = ?blueprint.broker.kind,
        topic = %blueprint.broker.topic,
        "Configuration loaded"
    );

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let shutdown = CancellationToken::new();
    spawn_shutdown_watcher(shutdown.clone());

    let stats = match blueprint.broker.kind {
        BrokerKind::Kafka => relay_to_kafka(&blueprint, shutdown).await?,
        BrokerKind::Memory => {
            let publisher = MemoryPublisher::new("memory");
            RelayLoop::new(blueprint.relay.clone(), publisher)?
                .run(shutdown)
                .await
                .context("Relay failed")?
        }
    };

    print_summary(&stats);
    info!("Relay finished");
    Ok(())
}

/// Run the relay against a real Kafka broker
#[cfg(feature = "real-kafka")]
async fn relay_to_kafka(
    blueprint: &ReplayBlueprint,
    shutdown: CancellationToken,
) -> Result<RelayStats> {
    use relay::KafkaPublisher;

    let publisher = KafkaPublisher::from_config(&blueprint.broker)
        .context("Failed to create Kafka producer")?;
    RelayLoop::new(blueprint.relay.clone(), publisher)?
        .run(shutdown)
        .await
        .context("Relay failed")
}

/// Stub when the Kafka backend is compiled out
#[cfg(not(feature = "real-kafka"))]
async fn relay_to_kafka(
    _blueprint: &ReplayBlueprint,
    _shutdown: CancellationToken,
) -> Result<RelayStats> {
    Err(CliError::broker_unavailable(
        "kafka",
        "rebuild with the `real-kafka` feature, or set broker.kind = \"memory\"",
    )
    .into())
}

/// Apply CLI overrides onto the blueprint
fn apply_overrides(blueprint: &mut ReplayBlueprint, args: &RelayArgs) {
    if let Some(ref endpoint) = args.endpoint {
        info!(endpoint = %endpoint, "Overriding endpoint from CLI");
        blueprint.relay.endpoint = endpoint.clone();
    }
    if let Some(ref broker) = args.broker {
        blueprint.broker.address = broker.clone();
    }
    if let Some(ref topic) = args.topic {
        blueprint.broker.topic = topic.clone();
    }
    if let Some(frequency) = args.frequency {
        blueprint.relay.frequency_secs = frequency;
    }
    if let Some(run_length) = args.run_length {
        blueprint.relay.run_length_secs = run_length;
    }
}

/// Print run statistics
fn print_summary(stats: &RelayStats) {
    println!("\n=== Relay Summary ===\n");
    println!("Iterations:        {}", stats.iterations);
    println!("Batches published: {}", stats.batches_published);
    println!("Records published: {}", stats.records_published);
    println!("Retries:           {}", stats.retries);
    println!("Duration:          {:.2}s", stats.duration.as_secs_f64());
    println!("Throughput:        {:.2} records/s", stats.records_per_sec());
    if stats.cancelled {
        println!("Run was cancelled by a shutdown signal");
    }
}
