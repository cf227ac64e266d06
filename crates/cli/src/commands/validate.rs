//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::ReplayBlueprint;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    corpus_dir: String,
    corpus_glob: String,
    server_port: u16,
    server_run_length_secs: u64,
    clamp_policy: String,
    relay_frequency_secs: u64,
    relay_run_length_secs: u64,
    broker_topic: String,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    corpus_dir: blueprint.corpus.dir.display().to_string(),
                    corpus_glob: blueprint.corpus.glob.clone(),
                    server_port: blueprint.server.port,
                    server_run_length_secs: blueprint.server.run_length_secs,
                    clamp_policy: format!("{:?}", blueprint.server.clamp_policy),
                    relay_frequency_secs: blueprint.relay.frequency_secs,
                    relay_run_length_secs: blueprint.relay.run_length_secs,
                    broker_topic: blueprint.broker.topic.clone(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect non-fatal configuration concerns
fn collect_warnings(blueprint: &ReplayBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.relay.run_length_secs != blueprint.server.run_length_secs {
        warnings.push(format!(
            "relay.run_length_secs ({}) differs from server.run_length_secs ({}); \
             the relay may stop early or poll an exhausted window",
            blueprint.relay.run_length_secs, blueprint.server.run_length_secs
        ));
    }

    if blueprint.relay.frequency_secs > blueprint.relay.run_length_secs {
        warnings.push(format!(
            "relay.frequency_secs ({}) exceeds relay.run_length_secs ({}); \
             only a single poll will happen",
            blueprint.relay.frequency_secs, blueprint.relay.run_length_secs
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("Configuration is valid: {}", result.config_path);
        if let Some(ref summary) = result.summary {
            println!("  corpus:  {} ({})", summary.corpus_dir, summary.corpus_glob);
            println!(
                "  server:  port {} over {}s ({})",
                summary.server_port, summary.server_run_length_secs, summary.clamp_policy
            );
            println!(
                "  relay:   every {}s for {}s",
                summary.relay_frequency_secs, summary.relay_run_length_secs
            );
            println!("  broker:  topic '{}'", summary.broker_topic);
        }
        if let Some(ref warnings) = result.warnings {
            for w in warnings {
                println!("  warning: {w}");
            }
        }
    } else {
        println!("Configuration is INVALID: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("  error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warns_on_run_length_mismatch() {
        let mut bp = ReplayBlueprint::default();
        bp.relay.run_length_secs = 100;
        bp.server.run_length_secs = 300;
        let warnings = collect_warnings(&bp);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("differs"));
    }

    #[test]
    fn test_no_warnings_for_default_blueprint() {
        assert!(collect_warnings(&ReplayBlueprint::default()).is_empty());
    }
}
