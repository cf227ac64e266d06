//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::ClampPolicy;
use std::path::PathBuf;

/// Replay Streamer - paced replay of a static event corpus
#[derive(Parser, Debug)]
#[command(
    name = "replay-streamer",
    author,
    version,
    about = "Simulates a live event stream from a static historical corpus",
    long_about = "Simulates a live event stream from a static historical corpus.\n\n\
                  `serve` paces a directory of JSON records out over a wall-clock \n\
                  window behind an HTTP delivery endpoint; `relay` polls that \n\
                  endpoint on a fixed cadence and forwards newly released records \n\
                  to a message broker."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "REPLAY_STREAMER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "REPLAY_STREAMER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the corpus over a paced delivery endpoint
    Serve(ServeArgs),

    /// Poll a delivery endpoint and forward batches to the broker
    Relay(RelayArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `serve` command
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "config.toml",
        env = "REPLAY_STREAMER_CONFIG"
    )]
    pub config: PathBuf,

    /// Override corpus directory from configuration
    #[arg(long, env = "REPLAY_STREAMER_CORPUS_DIR")]
    pub corpus_dir: Option<PathBuf>,

    /// Override corpus file glob from configuration
    #[arg(long, env = "REPLAY_STREAMER_GLOB")]
    pub glob: Option<String>,

    /// Override HTTP listen port from configuration
    #[arg(short, long, env = "REPLAY_STREAMER_PORT")]
    pub port: Option<u16>,

    /// Override release window length in seconds
    #[arg(long, env = "REPLAY_STREAMER_RUN_LENGTH")]
    pub run_length: Option<u64>,

    /// Override the final-record clamp policy
    #[arg(long, value_enum, env = "REPLAY_STREAMER_CLAMP_POLICY")]
    pub clamp_policy: Option<ClampPolicyArg>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "REPLAY_STREAMER_METRICS_PORT")]
    pub metrics_port: u16,

    /// Validate configuration and load the corpus, then exit without serving
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `relay` command
#[derive(Parser, Debug, Clone)]
pub struct RelayArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "config.toml",
        env = "REPLAY_STREAMER_CONFIG"
    )]
    pub config: PathBuf,

    /// Override delivery endpoint URL from configuration
    #[arg(long, env = "REPLAY_STREAMER_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Override broker address from configuration
    #[arg(long, env = "REPLAY_STREAMER_BROKER")]
    pub broker: Option<String>,

    /// Override target topic from configuration
    #[arg(short, long, env = "REPLAY_STREAMER_TOPIC")]
    pub topic: Option<String>,

    /// Override poll frequency in seconds
    #[arg(short, long, env = "REPLAY_STREAMER_FREQUENCY")]
    pub frequency: Option<u64>,

    /// Override total polling budget in seconds
    #[arg(long, env = "REPLAY_STREAMER_RUN_LENGTH")]
    pub run_length: Option<u64>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "REPLAY_STREAMER_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Also scan the corpus directory and report record counts
    #[arg(long)]
    pub corpus: bool,
}

/// Log output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// Structured JSON logs
    Json,
    /// Human-readable multi-line format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

/// Clap-friendly mirror of [`ClampPolicy`]
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ClampPolicyArg {
    /// Final record is never released (historical behavior)
    ExcludeFinal,
    /// Final record is released at window end
    IncludeFinal,
}

impl From<ClampPolicyArg> for ClampPolicy {
    fn from(arg: ClampPolicyArg) -> Self {
        match arg {
            ClampPolicyArg::ExcludeFinal => ClampPolicy::ExcludeFinal,
            ClampPolicyArg::IncludeFinal => ClampPolicy::IncludeFinal,
        }
    }
}
