//! Configuration loading utilities
//!
//! Provides helper functions for loading configuration from various sources
//! with proper error handling and validation.

use crate::{Result, config::Settings};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration loader with multiple source support
#[derive(Debug)]
pub struct ConfigLoader {
    /// Default settings
    defaults: Settings,
}

impl ConfigLoader {
    /// Create new configuration loader
    pub fn new() -> Self {
        Self {
            defaults: Settings::default(),
        }
    }

    /// Load configuration with precedence order:
    /// 1. Command line arguments (applied by the caller afterwards)
    /// 2. Environment variables
    /// 3. Configuration file
    /// 4. Default values (lowest priority)
    ///
    /// Without an explicit file the per-user default location is tried.
    pub fn load(&self, config_file: Option<&Path>) -> Result<Settings> {
        let mut settings = self.defaults.clone();

        let default_path = default_config_path();
        let (path, explicit) = match config_file {
            Some(path) => (Some(path), true),
            None => (default_path.as_deref(), false),
        };

        if let Some(path) = path {
            if path.exists() {
                info!("Loading configuration from file: {:?}", path);
                settings = Settings::from_file(path)?;
            } else if explicit {
                warn!("Configuration file not found: {:?}, using defaults", path);
            } else {
                debug!("No configuration file at {:?}", path);
            }
        }

        // Override with environment variables
        debug!("Applying environment variable overrides");
        settings = settings.merge_with_env()?;

        // Validate final configuration
        settings.validate()?;

        debug!("Final configuration: {:?}", settings);

        Ok(settings)
    }

    /// Load configuration from environment only
    pub fn from_env_only(&self) -> Result<Settings> {
        let settings = self.defaults.clone().merge_with_env()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Get default configuration
    pub fn defaults(&self) -> &Settings {
        &self.defaults
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-user configuration file location, e.g. `~/.config/bililive-api/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bililive-api").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let loader = ConfigLoader::new();
        assert_eq!(loader.defaults().client.timeout_secs, 30);
        assert_eq!(loader.defaults().probe.timeout_secs, 5);
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[client]
user_agent = "test-agent/1.0"
timeout_secs = 7

[endpoints]
live_base = "http://127.0.0.1:8080"
        "#
        )
        .unwrap();

        let loader = ConfigLoader::new();
        let settings = loader.load(Some(temp_file.path())).unwrap();

        assert_eq!(settings.client.user_agent, "test-agent/1.0");
        assert_eq!(settings.client.timeout_secs, 7);
        assert_eq!(settings.endpoints.live_base, "http://127.0.0.1:8080");
        assert_eq!(settings.endpoints.www_base, "https://www.bilibili.com");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[client]\ntimeout_secs = \"soon\"").unwrap();

        let loader = ConfigLoader::new();
        let result = loader.load(Some(temp_file.path()));
        assert!(matches!(result, Err(crate::Error::Toml(_))));
    }

    #[test]
    fn test_load_rejects_invalid_base() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[endpoints]\napi_base = \"nowhere\"").unwrap();

        let loader = ConfigLoader::new();
        let result = loader.load(Some(temp_file.path()));
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_missing_explicit_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        let loader = ConfigLoader::new();
        let settings = loader.load(Some(&missing)).unwrap();
        assert_eq!(settings.endpoints, loader.defaults().endpoints);
    }

    #[test]
    fn test_default_config_path_shape() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("bililive-api/config.toml"));
        }
    }
}
