//! Platform-specific configuration paths

use crate::error::{CliError, CliResult};
use std::path::PathBuf;

/// Configuration paths for the oxidir CLI
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Base configuration directory
    pub config_dir: PathBuf,
    /// Path to config.json
    pub config_file: PathBuf,
    /// Path to credentials.enc (encrypted credential file)
    pub credentials_file: PathBuf,
    /// Path to history.txt (browse shell readline history)
    pub history_file: PathBuf,
}

impl ConfigPaths {
    /// Get configuration paths for the current platform
    ///
    /// Paths:
    /// - Linux: ~/.config/oxidir/
    /// - macOS: ~/Library/Application Support/oxidir/
    /// - Windows: %APPDATA%\oxidir\
    pub fn new() -> CliResult<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self::from_base(config_dir))
    }

    /// Build paths rooted at an explicit directory
    pub fn from_base(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        Self {
            config_file: config_dir.join("config.json"),
            credentials_file: config_dir.join("credentials.enc"),
            history_file: config_dir.join("history.txt"),
            config_dir,
        }
    }

    /// Get the configuration directory, respecting OXIDIR_CONFIG_DIR env var
    fn get_config_dir() -> CliResult<PathBuf> {
        // Check for override environment variable
        if let Ok(dir) = std::env::var("OXIDIR_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        // Use platform-specific config directory
        let base_dir = dirs::config_dir().ok_or_else(|| {
            CliError::Config("Could not determine configuration directory".to_string())
        })?;

        Ok(base_dir.join("oxidir"))
    }

    /// Ensure the configuration directory exists
    pub fn ensure_dir_exists(&self) -> CliResult<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }
}
