//! CLI configuration utilities

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use todo_http::client::{ClientConfig, DEFAULT_API_PREFIX, DEFAULT_BASE_URL};

/// Settings for reaching the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    pub api_url: String,
    pub api_prefix: String,
    pub timeout_secs: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout_secs: 30,
        }
    }
}

impl CliConfig {
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(&self.api_url)
            .api_prefix(&self.api_prefix)
            .user_agent(concat!("todo-cli/", env!("CARGO_PKG_VERSION")));
        if self.timeout_secs > 0 {
            config = config.timeout(Duration::from_secs(self.timeout_secs));
        }
        config
    }
}

/// `<config dir>/todo/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("todo").join("config.toml"))
}

/// Load configuration from defaults, a file and `TODO_*` environment variables
///
/// An explicit `path` must exist; the default location is optional.
pub fn load_config(path: Option<&Path>) -> Result<CliConfig> {
    let defaults = CliConfig::default();

    let mut builder = config::Config::builder()
        .set_default("api_url", defaults.api_url)?
        .set_default("api_prefix", defaults.api_prefix)?
        .set_default("timeout_secs", defaults.timeout_secs)?;

    match path {
        Some(path) => {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        None => {
            if let Some(path) = default_config_path() {
                builder = builder.add_source(config::File::from(path).required(false));
            }
        }
    }

    let settings = builder
        .add_source(config::Environment::with_prefix("TODO").try_parsing(true))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "api_url = \"https://todo.example.com\"").unwrap();
        writeln!(file, "timeout_secs = 5").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.api_url, "https://todo.example.com");
        assert_eq!(config.api_prefix, DEFAULT_API_PREFIX);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn client_config_skips_zero_timeout() {
        let config = CliConfig {
            timeout_secs: 0,
            ..CliConfig::default()
        };
        let client = config.client_config();
        assert!(client.timeout.is_none());
        assert_eq!(client.api_root(), "http://localhost:8000/api/v1");
    }
}
