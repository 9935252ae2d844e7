//! Layered runtime settings: built-in defaults, then an optional
//! `config.toml`, then `SYNTHLOG_*` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Directory all generated and trace log files land in.
    pub dir: String,
}

/// Knobs for the fake inventory API's load/fault injection.
#[derive(Debug, Deserialize, Clone)]
pub struct FaultConfig {
    pub delay_probability: f64,
    pub delay_min_secs: f64,
    pub delay_max_secs: f64,
    pub error_probability: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub time_app: ServerConfig,
    pub server_store: ServerConfig,
    pub logging: LoggingConfig,
    pub faults: FaultConfig,
}

pub fn load() -> Result<AppConfig, ConfigError> {
    Config::builder()
        .set_default("time_app.host", "127.0.0.1")?
        .set_default("time_app.port", 8080)?
        .set_default("server_store.host", "127.0.0.1")?
        .set_default("server_store.port", 8081)?
        .set_default("logging.dir", "./logs")?
        .set_default("faults.delay_probability", 0.1)?
        .set_default("faults.delay_min_secs", 0.5)?
        .set_default("faults.delay_max_secs", 5.0)?
        .set_default("faults.error_probability", 0.05)?
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::with_prefix("SYNTHLOG").separator("__"))
        .build()?
        .try_deserialize()
}
