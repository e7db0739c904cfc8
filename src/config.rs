//! Service configuration.
//!
//! Layered sources, lowest to highest precedence: built-in defaults, an
//! optional TOML file, then `SOLACE_`-prefixed environment variables
//! (nested fields separated by `__`, e.g. `SOLACE_SERVER__PORT`).

use crate::agent::model::Network;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentName {
    Development,
    Production,
    Test,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaSettings {
    pub rpc_url: String,
    pub network: Network,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// trace, debug, info, warn, error, off
    pub level: String,
    /// text or json
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub environment: EnvironmentName,
    pub server: ServerSettings,
    pub solana: SolanaSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("environment", "development")?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3002_i64)?
            .set_default("solana.rpc_url", "https://api.devnet.solana.com")?
            .set_default("solana.network", "devnet")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "text")?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(Environment::with_prefix("SOLACE").separator("__"));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.logging.format.as_str() {
            "text" | "json" => {}
            other => {
                return Err(ConfigError::Message(format!(
                    "invalid logging.format: {other} (must be 'text' or 'json')"
                )))
            }
        }
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" | "off" => Ok(()),
            other => Err(ConfigError::Message(format!(
                "invalid logging.level: {other}"
            ))),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == EnvironmentName::Production
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
