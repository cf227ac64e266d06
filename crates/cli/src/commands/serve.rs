//! `serve` command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::info;

use contracts::ReplayBlueprint;
use corpus::CorpusLoader;
use pacer::Pacer;
use server::DeliveryServer;

use super::signal::spawn_shutdown_watcher;
use crate::cli::ServeArgs;
use crate::error::CliError;

/// Execute the `serve` command
pub async fn run_serve(args: &ServeArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    apply_overrides(&mut blueprint, args);

    info!(
        dir = %blueprint.corpus.dir.display(),
        glob = %blueprint.corpus.glob,
        port = blueprint.server.port,
        run_length_secs = blueprint.server.run_length_secs,
        clamp_policy = ?blueprint.server.clamp_policy,
        "Configuration loaded"
    );

    let corpus = CorpusLoader::load_from_dir(&blueprint.corpus.dir, &blueprint.corpus.glob)
        .context("Failed to load corpus")?;

    let run_length = blueprint.server.run_length();
    info!(
        records = corpus.len(),
        run_length_secs = run_length.as_secs(),
        approx_per_sec = corpus.len() as u64 / run_length.as_secs().max(1),
        "Corpus will be served over the release window"
    );

    if args.dry_run {
        info!("Dry run mode - configuration and corpus are valid, exiting");
        println!(
            "OK: {} records from {} ready to serve over {}s on port {}",
            corpus.len(),
            blueprint.corpus.dir.display(),
            blueprint.server.run_length_secs,
            blueprint.server.port
        );
        return Ok(());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    // The release window opens here, not at first request
    let pacer = Arc::new(
        Pacer::new(corpus, run_length, blueprint.server.clamp_policy)
            .context("Failed to construct pacer")?,
    );

    let server = DeliveryServer::bind(blueprint.server.port, pacer)
        .await
        .context("Failed to bind delivery endpoint")?;

    let shutdown = CancellationToken::new();
    spawn_shutdown_watcher(shutdown.clone());

    server
        .serve(shutdown)
        .await
        .context("Delivery endpoint failed")?;

    info!("Serve finished");
    Ok(())
}

/// Apply CLI overrides onto the blueprint
fn apply_overrides(blueprint: &mut ReplayBlueprint, args: &ServeArgs) {
    if let Some(ref dir) = args.corpus_dir {
        info!(dir = %dir.display(), "Overriding corpus directory from CLI");
        blueprint.corpus.dir = dir.clone();
    }
    if let Some(ref glob) = args.glob {
        blueprint.corpus.glob = glob.clone();
    }
    if let Some(port) = args.port {
        info!(port, "Overriding listen port from CLI");
        blueprint.server.port = port;
    }
    if let Some(run_length) = args.run_length {
        blueprint.server.run_length_secs = run_length;
    }
    if let Some(policy) = args.clamp_policy {
        blueprint.server.clamp_policy = policy.into();
    }
}
