//! Configuration module
//!
//! File-based settings with environment variable overrides.

#![allow(dead_code)]

pub mod env;

pub use env::EnvConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file locations, in order of precedence
const CONFIG_LOCATIONS: &[&str] = &[
    "./portal-smoke.yaml",
    "./portal-smoke.yml",
    "./.portal-smoke.yaml",
    "~/.config/portal-smoke/config.yaml",
    "~/.portal-smoke.yaml",
];

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Portal base URL
    pub base_url: String,

    /// Default number of smoke rounds
    pub default_rounds: u32,

    /// Navigation timeout in seconds
    pub timeout_secs: u64,

    /// Upper bound for the URL settle wait, milliseconds
    pub settle_ms: u64,

    /// Interval between URL/visibility polls, milliseconds
    pub poll_interval_ms: u64,

    /// Upper bound for the root element to become visible, milliseconds
    pub visibility_timeout_ms: u64,

    /// Run Chrome headless
    pub headless: bool,

    /// Explicit Chrome/Chromium binary path
    pub chrome_executable: Option<String>,

    /// Enable parallel execution by default
    pub parallel: bool,

    /// Maximum concurrent browser sessions
    pub max_concurrent: usize,

    /// Default output format
    pub default_format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5173".to_string(),
            default_rounds: 1,
            timeout_secs: 30,
            settle_ms: 5000,
            poll_interval_ms: 100,
            visibility_timeout_ms: 10000,
            headless: true,
            chrome_executable: None,
            parallel: false,
            max_concurrent: 4,
            default_format: "table".to_string(),
        }
    }
}

impl AppConfig {
    /// Find a configuration file in the standard locations
    pub fn find() -> Option<PathBuf> {
        for location in CONFIG_LOCATIONS {
            let path = expand_path(location);
            if path.exists() {
                return Some(path);
            }
        }
        None
    }

    /// Load from the first standard location, or defaults when none exists
    pub fn load_default() -> Result<Self> {
        if let Some(path) = Self::find() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a YAML or JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML or JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!("base_url must not be empty");
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }
        if self.max_concurrent == 0 {
            anyhow::bail!("max_concurrent must be at least 1");
        }
        if self.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be at least 1");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(mut self, env: &EnvConfig) -> Self {
        if let Some(base_url) = &env.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(timeout) = env.timeout {
            self.timeout_secs = timeout;
        }
        if let Some(rounds) = env.rounds {
            self.default_rounds = rounds;
        }
        if let Some(parallel) = env.parallel {
            self.parallel = parallel;
        }
        if let Some(headless) = env.headless {
            self.headless = headless;
        }
        if let Some(chrome) = &env.chrome_executable {
            self.chrome_executable = Some(chrome.clone());
        }
        if let Some(format) = &env.format {
            self.default_format = format.clone();
        }
        self
    }

    /// Generate an example configuration
    pub fn example() -> Self {
        Self {
            base_url: "http://localhost:5173".to_string(),
            default_rounds: 3,
            parallel: true,
            ..Self::default()
        }
    }
}

/// Expand ~ to the home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.base_url, "http://localhost:5173");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.headless);
    }

    #[test]
    fn test_config_save_load_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let config = AppConfig::example();
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.base_url, config.base_url);
        assert_eq!(loaded.default_rounds, 3);
        assert!(loaded.parallel);
    }

    #[test]
    fn test_config_save_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = AppConfig::default();
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.max_concurrent, config.max_concurrent);
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let config = AppConfig {
            base_url: "localhost:5173".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = AppConfig {
            max_concurrent: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expand_path() {
        let path = expand_path("./test.yaml");
        assert_eq!(path, PathBuf::from("./test.yaml"));
    }
}
