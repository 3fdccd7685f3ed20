use config::{Environment, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not locate configuration file: {0}")]
    MissingPath(#[from] std::io::Error),
    #[error("Could not read configuration. Details:\n{0}")]
    Invalid(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Upper bound on pooled connections. Defaults to the number of runtime worker threads when zero.
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub port: u16,
    /// Fallback tracing filter, used when `RUST_LOG` is not set.
    pub log_filter: String,
    pub request_timeout_seconds: u64,
    pub default_page_size: i64,
    pub max_page_size: i64,
    pub database: DatabaseConfig,
}

impl Config {
    /// Reads `config.toml` next to the executable in production or `config.toml.dist` in development.
    /// Any key can be overridden by an environment variable like `FORUM__PORT` or `FORUM__DATABASE__MAX_CONNECTIONS`.
    pub fn new() -> Result<Self, ConfigError> {
        let path = get_config_path()?;
        config::Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .add_source(Environment::with_prefix("FORUM").separator("__"))
            .build()?
            .try_deserialize()
            .map_err(ConfigError::from)
    }

    /// Parses configuration from TOML `source` without consulting the environment.
    #[cfg(test)]
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        config::Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(ConfigError::from)
    }

    /// Clamps a client-requested page size into `[0, max_page_size]`.
    pub fn page_size(&self, requested: Option<i64>) -> i64 {
        requested.unwrap_or(self.default_page_size).clamp(0, self.max_page_size)
    }
}

fn get_config_path() -> std::io::Result<PathBuf> {
    // Use config.toml.dist if in development environment, config.toml if in production
    match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(var) => {
            let mut project_path = PathBuf::from(var);
            project_path.push("config.toml.dist");
            Ok(project_path)
        }
        Err(_) => {
            let exe_path = std::env::current_exe()?;
            let mut parent_path = exe_path.parent().map(PathBuf::from).unwrap_or_default();
            parent_path.push("config.toml");
            Ok(parent_path)
        }
    }
}
