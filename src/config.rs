use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub generator: GeneratorSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Text-generation service (Ollama-compatible)
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorSettings {
    #[serde(default = "default_generator_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            base_url: default_generator_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_generator_url() -> String { "http://localhost:11434".to_string() }
fn default_model() -> String { "llama3".to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_temperature() -> f64 { 0.3 }
fn default_top_p() -> f64 { 0.9 }
fn default_max_tokens() -> u32 { 1000 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSettings {
    /// Products analysed per batch when the request gives no limit
    #[serde(default = "default_batch_limit")]
    pub batch_limit: u32,
    /// Metrics older than this are recomputed
    #[serde(default = "default_stale_after_days")]
    pub stale_after_days: u32,
    /// Minimum score for the report's top-opportunity section
    #[serde(default = "default_report_min_score")]
    pub report_min_score: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            batch_limit: default_batch_limit(),
            stale_after_days: default_stale_after_days(),
            report_min_score: default_report_min_score(),
        }
    }
}

fn default_batch_limit() -> u32 { 50 }
fn default_stale_after_days() -> u32 { 7 }
fn default_report_min_score() -> f64 { 7.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

/// Console output style for `tracing-subscriber`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One line per event
    #[default]
    Compact,
    /// Multi-line, human oriented
    Pretty,
    /// The subscriber's standard single-line layout
    Full,
}

impl LogFormat {
    /// Parse a LOG_FORMAT value; unknown names yield `None`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "compact" => Some(LogFormat::Compact),
            "pretty" => Some(LogFormat::Pretty),
            "full" => Some(LogFormat::Full),
            _ => None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SCOUT__)
    /// 5. DATABASE_URL / OLLAMA_URL
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SCOUT__SERVER__PORT -> server.port
            .add_source(scout_environment())
            .build()?;

        let settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(scout_environment())
            .build()?;

        settings.try_deserialize()
    }
}

fn scout_environment() -> Environment {
    Environment::with_prefix("SCOUT")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the conventional DATABASE_URL and OLLAMA_URL variables on top of
/// everything else
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(ollama_url) = env::var("OLLAMA_URL") {
        builder = builder.set_override("generator.base_url", ollama_url)?;
    }

    builder.build()
}
