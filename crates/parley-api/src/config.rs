use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub store: StoreSection,
    pub model: ModelSection,
    pub engine: EngineSection,
    pub tools: ToolsSection,
    #[serde(default)]
    pub connectors: ConnectorsSection,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub mongodb_uri: String,
    #[serde(default)]
    pub openai_api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    /// "mongo" or "memory"
    pub backend: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSection {
    pub default_model: String,
    #[serde(default)]
    pub models: Vec<String>,
    /// Override for the model service endpoint (tests, proxies)
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSection {
    pub max_round_trips: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolsSection {
    pub faq_data_path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectorsSection {
    /// Catalog specification, `id|Label|Description;...`
    #[serde(default)]
    pub spec: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (SERVER_, STORE_, MODEL_, ENGINE_, LOG_ prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::default()
                    .prefix("SERVER")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("STORE")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("MODEL")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("ENGINE")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("LOG")
                    .separator("_")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Secrets never live in TOML.
        cfg.openai_api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ConfigError::Message("OPENAI_API_KEY environment variable is required".to_string())
        })?;
        if cfg.store.backend == "mongo" {
            cfg.mongodb_uri = std::env::var("MONGODB_URI").map_err(|_| {
                ConfigError::Message(
                    "MONGODB_URI environment variable is required for the mongo backend"
                        .to_string(),
                )
            })?;
        }

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_structure() {
        let raw = r#"
            [server]
            host = "127.0.0.1"
            port = 3001

            [cors]
            enabled = true
            origins = ["http://localhost:3000"]

            [store]
            backend = "memory"
            database = "parley"

            [model]
            default_model = "gpt-4.1-mini"
            models = ["gpt-4.1-mini", "gpt-4.1"]

            [engine]
            max_round_trips = 8

            [tools]
            faq_data_path = "data/company_faq.json"

            [connectors]
            spec = "drive|Google Drive|Search files"

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.engine.max_round_trips, 8);
        assert_eq!(config.model.models.len(), 2);
    }
}
