//! Persistent CLI settings

use crate::config::ConfigPaths;
use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};

/// Persistent settings for the oxidir CLI, stored as config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the directory REST facade
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Entries fetched per page when listing
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Seconds of inactivity before the browse shell ends the session
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// DN attribute that carries the login name of a user entry
    #[serde(default = "default_login_attribute")]
    pub login_attribute: String,
}

fn default_server_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    25
}

fn default_idle_timeout_secs() -> u64 {
    600
}

fn default_login_attribute() -> String {
    "uid".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
            idle_timeout_secs: default_idle_timeout_secs(),
            login_attribute: default_login_attribute(),
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it does not exist
    pub fn load(paths: &ConfigPaths) -> CliResult<Self> {
        if !paths.config_file.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&paths.config_file)?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| CliError::Config(format!("Invalid config file: {e}")))?;
        Ok(config)
    }

    /// Write the config file, creating the config directory if needed
    pub fn save(&self, paths: &ConfigPaths) -> CliResult<()> {
        paths.ensure_dir_exists()?;
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&paths.config_file, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server_url, "http://localhost:8000");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.page_size, 25);
        assert_eq!(config.idle_timeout_secs, 600);
        assert_eq!(config.login_attribute, "uid");
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::from_base(dir.path());
        let config = Config::load(&paths).unwrap();
        assert_eq!(config.server_url, "http://localhost:8000");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::from_base(dir.path().join("nested"));

        let mut config = Config::default();
        config.server_url = "https://directory.example.com".to_string();
        config.page_size = 50;
        config.save(&paths).unwrap();

        let loaded = Config::load(&paths).unwrap();
        assert_eq!(loaded.server_url, "https://directory.example.com");
        assert_eq!(loaded.page_size, 50);
        assert_eq!(loaded.timeout_secs, 30);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::from_base(dir.path());
        paths.ensure_dir_exists().unwrap();
        std::fs::write(
            &paths.config_file,
            r#"{"server_url": "http://10.0.0.5:8000"}"#,
        )
        .unwrap();

        let config = Config::load(&paths).unwrap();
        assert_eq!(config.server_url, "http://10.0.0.5:8000");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.login_attribute, "uid");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::from_base(dir.path());
        paths.ensure_dir_exists().unwrap();
        std::fs::write(&paths.config_file, "not json").unwrap();

        let result = Config::load(&paths);
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
