use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for teller
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TellerConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Review worker settings
    pub review: ReviewConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
    /// Database settings (optional; in-memory store when absent)
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Listen port
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewConfig {
    /// Bounded capacity of the review channel
    pub queue_capacity: usize,
    /// Account types approved without manual review
    pub auto_approve_types: Vec<String>,
    /// Upper bound for the simulated review latency, 0 disables it
    pub max_decision_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite file path or connection string
    pub url: String,
}

impl Default for TellerConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            review: ReviewConfig {
                queue_capacity: 64,
                auto_approve_types: vec!["checking".to_string(), "savings".to_string()],
                max_decision_delay_ms: 0,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
            },
            database: None,
        }
    }
}

impl TellerConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (teller.toml)
    /// 3. Environment variables (prefixed with TELLER_)
    pub fn load() -> Result<Self> {
        let defaults = Config::try_from(&TellerConfig::default())?;

        let mut builder = Config::builder().add_source(defaults);

        if Path::new("teller.toml").exists() {
            builder = builder.add_source(File::with_name("teller"));
        }

        builder = builder.add_source(
            Environment::with_prefix("TELLER")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let teller_config: TellerConfig = config.try_deserialize()?;
        Ok(teller_config)
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<TellerConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = TellerConfig::load_env_file();
        TellerConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static TellerConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}
