//! ReplayBlueprint - Config Loader 输出
//!
//! 描述一次完整回放的配置：语料目录、服务端窗口、中继节奏、broker 路由。

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete replay configuration blueprint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// Corpus location and file pattern
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Delivery server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Relay loop settings
    #[serde(default)]
    pub relay: RelayConfig,

    /// Broker routing settings
    #[serde(default)]
    pub broker: BrokerConfig,
}

/// Corpus source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Directory scanned for corpus files
    #[serde(default = "default_corpus_dir")]
    pub dir: PathBuf,

    /// Glob pattern matched against file names (not paths)
    #[serde(default = "default_glob")]
    pub glob: String,
}

fn default_corpus_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_glob() -> String {
    "*.json".to_string()
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            dir: default_corpus_dir(),
            glob: default_glob(),
        }
    }
}

/// Delivery server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Wall-clock window over which the corpus is paced out, in seconds.
    /// Must be > 0; validated at load time and again at pacer construction.
    #[serde(default = "default_run_length")]
    pub run_length_secs: u64,

    /// Release bound for the final record (see [`ClampPolicy`])
    #[serde(default)]
    pub clamp_policy: ClampPolicy,
}

fn default_port() -> u16 {
    4056
}

fn default_run_length() -> u64 {
    300
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            run_length_secs: default_run_length(),
            clamp_policy: ClampPolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Run length as a [`Duration`]
    pub fn run_length(&self) -> Duration {
        Duration::from_secs(self.run_length_secs)
    }
}

/// How the release target is capped at the end of the corpus.
///
/// The historical service capped the target index at `len - 1`, which
/// structurally excludes the final record from ever being released.
/// `ExcludeFinal` reproduces that behavior and is the default;
/// `IncludeFinal` caps at `len` so the whole corpus drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampPolicy {
    /// Cap target at `len - 1`; the last record is never released
    #[default]
    ExcludeFinal,
    /// Cap target at `len`; the last record is released at window end
    IncludeFinal,
}

/// Relay loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Delivery endpoint URL polled each iteration
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Target poll cadence in seconds; must be > 0
    #[serde(default = "default_frequency")]
    pub frequency_secs: u64,

    /// Total polling budget in seconds; the loop stops once the
    /// per-iteration budget (advanced by `frequency_secs`) reaches it
    #[serde(default = "default_run_length")]
    pub run_length_secs: u64,

    /// What to do when a fetch or publish fails
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Max attempts per operation under [`FailurePolicy::Retry`]
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// First retry backoff in milliseconds; doubles per attempt
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

fn default_endpoint() -> String {
    "http://localhost:4056/v1/next".to_string()
}

fn default_frequency() -> u64 {
    1
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_backoff_ms() -> u64 {
    200
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            frequency_secs: default_frequency(),
            run_length_secs: default_run_length(),
            failure_policy: FailurePolicy::default(),
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

impl RelayConfig {
    /// Poll cadence as a [`Duration`]
    pub fn frequency(&self) -> Duration {
        Duration::from_secs(self.frequency_secs)
    }

    /// Total run budget as a [`Duration`]
    pub fn run_length(&self) -> Duration {
        Duration::from_secs(self.run_length_secs)
    }

    /// First retry backoff as a [`Duration`]
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }
}

/// Fetch/publish failure handling policy.
///
/// `FailFast` matches the historical relay: the first I/O failure aborts the
/// run. `Retry` keeps the relay live through transient broker or endpoint
/// hiccups with bounded, doubling backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort on the first fetch or publish failure
    #[default]
    FailFast,
    /// Retry transient failures up to `max_attempts`, then abort
    Retry,
}

/// Broker client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Publisher backend
    #[serde(default)]
    pub kind: BrokerKind,

    /// Broker bootstrap address
    #[serde(default = "default_broker_address")]
    pub address: String,

    /// Target stream/topic name
    #[serde(default = "default_topic")]
    pub topic: String,

    /// Producer message timeout in milliseconds
    #[serde(default = "default_message_timeout_ms")]
    pub message_timeout_ms: u64,
}

fn default_broker_address() -> String {
    "localhost:9092".to_string()
}

fn default_topic() -> String {
    "events".to_string()
}

fn default_message_timeout_ms() -> u64 {
    10_000
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            kind: BrokerKind::default(),
            address: default_broker_address(),
            topic: default_topic(),
            message_timeout_ms: default_message_timeout_ms(),
        }
    }
}

/// Publisher backend selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrokerKind {
    /// Kafka producer (requires the `real-kafka` feature of the relay crate)
    #[default]
    Kafka,
    /// In-memory capture, for tests and dry runs
    Memory,
}
