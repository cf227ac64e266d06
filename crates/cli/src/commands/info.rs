//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use corpus::CorpusLoader;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Info output for JSON mode
#[derive(Serialize)]
struct InfoOutput {
    config_path: String,
    blueprint: contracts::ReplayBlueprint,
    #[serde(skip_serializing_if = "Option::is_none")]
    corpus_records: Option<usize>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Reading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let corpus_records = if args.corpus {
        let corpus = CorpusLoader::load_from_dir(&blueprint.corpus.dir, &blueprint.corpus.glob)
            .context("Failed to scan corpus")?;
        Some(corpus.len())
    } else {
        None
    };

    if args.json {
        let output = InfoOutput {
            config_path: args.config.display().to_string(),
            blueprint,
            corpus_records,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("\n=== Replay Configuration ===\n");
    println!("Corpus:");
    println!("  Directory: {}", blueprint.corpus.dir.display());
    println!("  Glob:      {}", blueprint.corpus.glob);
    if let Some(records) = corpus_records {
        println!("  Records:   {records}");
        if blueprint.server.run_length_secs > 0 {
            println!(
                "  Rate:      ~{} records/s over the window",
                records as u64 / blueprint.server.run_length_secs
            );
        }
    }
    println!("Server:");
    println!("  Port:         {}", blueprint.server.port);
    println!("  Run length:   {}s", blueprint.server.run_length_secs);
    println!("  Clamp policy: {:?}", blueprint.server.clamp_policy);
    println!("Relay:");
    println!("  Endpoint:   {}", blueprint.relay.endpoint);
    println!("  Frequency:  {}s", blueprint.relay.frequency_secs);
    println!("  Run length: {}s", blueprint.relay.run_length_secs);
    println!("  On failure: {:?}", blueprint.relay.failure_policy);
    println!("Broker:");
    println!("  Kind:    {:?}", blueprint.broker.kind);
    println!("  Address: {}", blueprint.broker.address);
    println!("  Topic:   {}", blueprint.broker.topic);

    Ok(())
}
