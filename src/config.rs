use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use validator::Validate;

const CONFIG_DIR: &str = "config";
const DEFAULT_ENV: &str = "development";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("configuration load error: {0}")]
    Load(#[from] ConfigError),
    #[error("configuration validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Topic triple identifying the sale-created integration event on the bus:
/// the topic itself, the consumer group reading it, and the error topic the
/// transport routes failed deliveries to.
#[derive(Clone, Debug, Deserialize)]
pub struct EventTopics {
    #[serde(default = "default_sale_created_topic")]
    pub sale_created: String,
    #[serde(default = "default_sale_created_group")]
    pub sale_created_group: String,
    #[serde(default = "default_sale_created_error")]
    pub sale_created_error: String,
}

impl Default for EventTopics {
    fn default() -> Self {
        Self {
            sale_created: default_sale_created_topic(),
            sale_created_group: default_sale_created_group(),
            sale_created_error: default_sale_created_error(),
        }
    }
}

fn default_sale_created_topic() -> String {
    "integration.sales.SaleCreated".to_string()
}

fn default_sale_created_group() -> String {
    "integration.sales.SaleCreated-group".to_string()
}

fn default_sale_created_error() -> String {
    "integration.sales.SaleCreated_Error".to_string()
}

/// Application configuration with validation.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,

    /// Server host address
    #[validate(length(min = 1))]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// Deliver sale-created events to the message channel; when false the
    /// publisher logs the payload instead of sending it.
    #[serde(default)]
    pub publish_events: bool,

    /// Integration event topics
    #[serde(default)]
    pub event_topics: EventTopics,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// DB pool: min connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// DB connect timeout in seconds
    #[serde(default = "default_db_connect_timeout")]
    pub db_connect_timeout_secs: u64,

    /// DB idle timeout in seconds
    #[serde(default = "default_db_idle_timeout")]
    pub db_idle_timeout_secs: u64,

    /// DB acquire timeout in seconds
    #[serde(default = "default_db_acquire_timeout")]
    pub db_acquire_timeout_secs: u64,
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_db_min_connections() -> u32 {
    1
}

fn default_db_connect_timeout() -> u64 {
    30
}

fn default_db_idle_timeout() -> u64 {
    600
}

fn default_db_acquire_timeout() -> u64 {
    8
}

impl AppConfig {
    /// Minimal configuration for embedding the app in tests.
    pub fn for_tests(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_json: false,
            auto_migrate: true,
            publish_events: true,
            event_topics: EventTopics::default(),
            db_max_connections: 1,
            db_min_connections: 1,
            db_connect_timeout_secs: 5,
            db_idle_timeout_secs: 60,
            db_acquire_timeout_secs: 5,
        }
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

/// Initializes tracing using the provided log level as the default filter.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("saleflow_api={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .json()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .try_init();
    }
}

/// Loads application configuration.
///
/// Layers configuration sources in this order:
/// 1. Default config (config/default.toml)
/// 2. Environment-specific config (config/{env}.toml)
/// 3. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .set_default("database_url", "sqlite://saleflow.db?mode=rwc")?
        .set_default("host", "0.0.0.0")?
        .set_default("port", 8080)?
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;
    app_config.validate()?;

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_topics_default_to_integration_triple() {
        let topics = EventTopics::default();
        assert_eq!(topics.sale_created, "integration.sales.SaleCreated");
        assert_eq!(topics.sale_created_group, "integration.sales.SaleCreated-group");
        assert_eq!(topics.sale_created_error, "integration.sales.SaleCreated_Error");
    }

    #[test]
    fn test_config_enables_migrations_and_publishing() {
        let cfg = AppConfig::for_tests("sqlite::memory:");
        assert!(cfg.auto_migrate);
        assert!(cfg.publish_events);
        assert_eq!(cfg.db_max_connections, 1);
    }
}
