//! Configuration model loaded from external sources.

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

/// Prefix of the environment variables overriding file settings,
/// e.g. `INVENTORY_API_BASE_URL`.
pub const ENV_PREFIX: &str = "INVENTORY";

#[derive(Clone, Debug, Deserialize, PartialEq)]
/// Settings shared by the transport, the list controllers and the CLI.
pub struct DashboardConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub default_page_size: usize,
    pub min_page_size: usize,
    pub max_page_size: usize,
    pub session_file: String,
}

impl DashboardConfig {
    /// Loads defaults, then the optional YAML file, then `INVENTORY_*`
    /// environment variables.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads configuration without consulting the process environment.
    pub fn load_file(path: &str) -> Result<Self, ConfigError> {
        Self::build(Config::builder().add_source(
            File::with_name(path).format(FileFormat::Yaml).required(true),
        ))
    }

    fn load_with_env(path: Option<&str>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                File::with_name(path)
                    .format(FileFormat::Yaml)
                    .required(false),
            );
        }
        Self::build(builder.add_source(env))
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let config: DashboardConfig = builder
            .set_default("api_base_url", "http://localhost:8000/api")?
            .set_default("request_timeout_secs", 30)?
            .set_default("default_page_size", 20)?
            .set_default("min_page_size", 5)?
            .set_default("max_page_size", 100)?
            .set_default("session_file", ".inventory-session.json")?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_page_size == 0 {
            return Err(ConfigError::Message(
                "min_page_size must be greater than zero".to_string(),
            ));
        }
        if self.min_page_size > self.max_page_size {
            return Err(ConfigError::Message(format!(
                "min_page_size ({}) exceeds max_page_size ({})",
                self.min_page_size, self.max_page_size
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            request_timeout_secs: 30,
            default_page_size: 20,
            min_page_size: 5,
            max_page_size: 100,
            session_file: ".inventory-session.json".to_string(),
        }
    }
}
