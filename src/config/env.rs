//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

#![allow(dead_code)]

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "PORTAL_SMOKE";

/// Configuration overrides from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Portal base URL from PORTAL_SMOKE_BASE_URL
    pub base_url: Option<String>,
    /// Timeout from PORTAL_SMOKE_TIMEOUT
    pub timeout: Option<u64>,
    /// Rounds from PORTAL_SMOKE_ROUNDS
    pub rounds: Option<u32>,
    /// Parallel from PORTAL_SMOKE_PARALLEL
    pub parallel: Option<bool>,
    /// Headless from PORTAL_SMOKE_HEADLESS
    pub headless: Option<bool>,
    /// Chrome binary from PORTAL_SMOKE_CHROME
    pub chrome_executable: Option<String>,
    /// Config file from PORTAL_SMOKE_CONFIG
    pub config_file: Option<String>,
    /// Verbose from PORTAL_SMOKE_VERBOSE
    pub verbose: Option<bool>,
    /// Output format from PORTAL_SMOKE_FORMAT
    pub format: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            base_url: get_env("BASE_URL"),
            timeout: get_env_parse("TIMEOUT"),
            rounds: get_env_parse("ROUNDS"),
            parallel: get_env_bool("PARALLEL"),
            headless: get_env_bool("HEADLESS"),
            chrome_executable: get_env("CHROME"),
            config_file: get_env("CONFIG"),
            verbose: get_env_bool("VERBOSE"),
            format: get_env("FORMAT"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.base_url.is_some()
            || self.timeout.is_some()
            || self.rounds.is_some()
            || self.parallel.is_some()
            || self.headless.is_some()
            || self.chrome_executable.is_some()
            || self.config_file.is_some()
            || self.verbose.is_some()
            || self.format.is_some()
    }

    pub fn base_url_or(&self, default: &str) -> String {
        self.base_url.clone().unwrap_or_else(|| default.to_string())
    }

    pub fn timeout_or(&self, default: u64) -> u64 {
        self.timeout.unwrap_or(default)
    }

    pub fn rounds_or(&self, default: u32) -> u32 {
        self.rounds.unwrap_or(default)
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {}_BASE_URL:  {:?}", ENV_PREFIX, self.base_url);
        println!("  {}_TIMEOUT:   {:?}", ENV_PREFIX, self.timeout);
        println!("  {}_ROUNDS:    {:?}", ENV_PREFIX, self.rounds);
        println!("  {}_PARALLEL:  {:?}", ENV_PREFIX, self.parallel);
        println!("  {}_HEADLESS:  {:?}", ENV_PREFIX, self.headless);
        println!("  {}_CHROME:    {:?}", ENV_PREFIX, self.chrome_executable);
        println!("  {}_CONFIG:    {:?}", ENV_PREFIX, self.config_file);
        println!("  {}_VERBOSE:   {:?}", ENV_PREFIX, self.verbose);
        println!("  {}_FORMAT:    {:?}", ENV_PREFIX, self.format);
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Builder for setting environment variables (useful for testing)
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

impl EnvBuilder {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_BASE_URL"), url.into()));
        self
    }

    pub fn timeout(mut self, timeout: u64) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_TIMEOUT"), timeout.to_string()));
        self
    }

    pub fn rounds(mut self, rounds: u32) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_ROUNDS"), rounds.to_string()));
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_PARALLEL"), parallel.to_string()));
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_HEADLESS"), headless.to_string()));
        self
    }

    /// Apply environment variables
    pub fn apply(self) {
        for (key, value) in self.vars {
            env::set_var(key, value);
        }
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        self.apply();

        EnvGuard { previous }
    }
}

impl Default for EnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that restores environment variables on drop
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all PORTAL_SMOKE environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_BASE_URL    Portal base URL");
    println!("  {ENV_PREFIX}_TIMEOUT     Navigation timeout in seconds");
    println!("  {ENV_PREFIX}_ROUNDS      Number of smoke rounds");
    println!("  {ENV_PREFIX}_PARALLEL    Enable parallel execution (true/false)");
    println!("  {ENV_PREFIX}_HEADLESS    Run Chrome headless (true/false)");
    println!("  {ENV_PREFIX}_CHROME      Path to Chrome/Chromium binary");
    println!("  {ENV_PREFIX}_CONFIG      Path to configuration file");
    println!("  {ENV_PREFIX}_VERBOSE     Enable verbose output (true/false)");
    println!("  {ENV_PREFIX}_FORMAT      Output format (table, json, csv)");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_BASE_URL=http://localhost:5173");
    println!("  export {ENV_PREFIX}_PARALLEL=true");
    println!("  portal-smoke check");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_config_default() {
        let config = EnvConfig::default();
        assert!(config.base_url.is_none());
        assert!(!config.has_any());
    }

    #[test]
    fn test_env_config_fallback() {
        let config = EnvConfig::default();
        assert_eq!(
            config.base_url_or("http://localhost:5173"),
            "http://localhost:5173"
        );
        assert_eq!(config.timeout_or(30), 30);
        assert_eq!(config.rounds_or(1), 1);
    }

    #[test]
    fn test_env_builder() {
        let _guard = EnvBuilder::new()
            .base_url("http://portal.test:8080")
            .timeout(60)
            .rounds(5)
            .apply_scoped();

        let config = EnvConfig::load();
        assert_eq!(config.base_url, Some("http://portal.test:8080".to_string()));
        assert_eq!(config.timeout, Some(60));
        assert_eq!(config.rounds, Some(5));
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = EnvBuilder::new().parallel(true).apply_scoped();

        let config = EnvConfig::load();
        assert_eq!(config.parallel, Some(true));
    }
}
