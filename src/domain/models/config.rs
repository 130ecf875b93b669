use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for Planora
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Ranking oracle configuration
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Suggestion engine tuning
    #[serde(default)]
    pub selection: SelectionConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".planora/planora.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// sqlx connection URL for the configured path.
    pub fn url(&self) -> String {
        if self.path.starts_with("sqlite:") {
            self.path.clone()
        } else {
            format!("sqlite:{}", self.path)
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Rotation for file output: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Which ranking oracle backs suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OracleProvider {
    #[default]
    Gemini,
    /// Never call out; every suggestion uses the fallback selector.
    Disabled,
}

/// Ranking oracle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OracleConfig {
    #[serde(default)]
    pub provider: OracleProvider,

    /// API key (falls back to `GEMINI_API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_oracle_base_url")]
    pub base_url: String,

    #[serde(default = "default_oracle_model")]
    pub model: String,

    /// Upper bound for one ranking call, retries included
    #[serde(default = "default_oracle_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Retries for transient transport failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

fn default_oracle_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_oracle_model() -> String {
    "gemini-2.5-flash".to_string()
}

const fn default_oracle_timeout_secs() -> u64 {
    20
}

const fn default_requests_per_second() -> u32 {
    5
}

const fn default_max_retries() -> u32 {
    2
}

const fn default_initial_backoff_ms() -> u64 {
    500
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            provider: OracleProvider::default(),
            api_key: None,
            base_url: default_oracle_base_url(),
            model: default_oracle_model(),
            timeout_secs: default_oracle_timeout_secs(),
            requests_per_second: default_requests_per_second(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

impl OracleConfig {
    /// Get API key from config or environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.trim().is_empty()))
    }
}

/// Suggestion engine tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SelectionConfig {
    /// Maximum number of candidates handed to the oracle and fallback
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,

    /// Percentage above the hard budget tolerated by the catalog filter
    #[serde(default = "default_soft_buffer_percent")]
    pub soft_buffer_percent: u32,
}

const fn default_candidate_limit() -> usize {
    50
}

const fn default_soft_buffer_percent() -> u32 {
    5
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            candidate_limit: default_candidate_limit(),
            soft_buffer_percent: default_soft_buffer_percent(),
        }
    }
}
