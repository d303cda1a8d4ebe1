//! Pre-flight checks
//!
//! Confirms the environment can actually run the smoke suite before
//! any browser is launched: the portal answers over HTTP, the login
//! page is served, and a Chrome binary is discoverable.

#![allow(dead_code)]

use chromiumoxide::detection::{self, DetectionOptions};
use tracing::info;

use crate::http::HttpClient;
use crate::models::Route;

/// One pre-flight probe outcome
#[derive(Clone, Debug)]
pub struct PreflightCheck {
    pub name: String,
    pub message: String,
    pub passed: bool,
}

impl PreflightCheck {
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            passed: true,
        }
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            passed: false,
        }
    }
}

/// Pre-flight checker for the smoke environment
pub struct PreflightChecker {
    client: HttpClient,
}

impl PreflightChecker {
    pub fn new(timeout_secs: u64) -> anyhow::Result<Self> {
        Ok(Self {
            client: HttpClient::with_timeout(timeout_secs)?,
        })
    }

    /// Run all pre-flight checks against the portal base URL
    pub async fn run(&self, base_url: &str) -> PreflightResult {
        info!("Running pre-flight checks for {}", base_url);

        let checks = vec![
            self.check_portal_reachable(base_url).await,
            self.check_login_page(base_url).await,
            self.check_chrome(),
        ];

        let passed = checks.iter().filter(|c| c.passed).count();
        let total = checks.len();

        PreflightResult {
            passed: passed == total,
            checks,
            message: if passed == total {
                "All pre-flight checks passed. Ready to run smoke checks.".to_string()
            } else {
                format!("{passed}/{total} checks passed. Some issues found.")
            },
        }
    }

    async fn check_portal_reachable(&self, base_url: &str) -> PreflightCheck {
        match self.client.get(base_url).await {
            Ok(resp) if !resp.is_server_error() => PreflightCheck::pass(
                "Portal",
                format!("Responded {} in {}ms", resp.status_code, resp.duration_ms),
            ),
            Ok(resp) => PreflightCheck::fail(
                "Portal",
                format!("Responded with server error {}", resp.status_code),
            ),
            Err(e) => PreflightCheck::fail("Portal", e.to_string()),
        }
    }

    async fn check_login_page(&self, base_url: &str) -> PreflightCheck {
        let url = format!("{}{}", base_url.trim_end_matches('/'), Route::Login.path());
        match self.client.get(&url).await {
            Ok(resp) if resp.is_success() => {
                PreflightCheck::pass("Login page", format!("Served at {}", resp.final_url))
            }
            Ok(resp) => PreflightCheck::fail(
                "Login page",
                format!("Responded {} at {}", resp.status_code, resp.final_url),
            ),
            Err(e) => PreflightCheck::fail("Login page", e.to_string()),
        }
    }

    fn check_chrome(&self) -> PreflightCheck {
        match detection::default_executable(DetectionOptions::default()) {
            Ok(path) => PreflightCheck::pass("Chrome", format!("Found at {}", path.display())),
            Err(e) => PreflightCheck::fail("Chrome", format!("No Chrome/Chromium binary: {e}")),
        }
    }
}

/// Aggregated pre-flight outcome
#[derive(Clone, Debug)]
pub struct PreflightResult {
    /// Whether every check passed
    pub passed: bool,
    pub checks: Vec<PreflightCheck>,
    pub message: String,
}

impl PreflightResult {
    /// Format as table
    pub fn format_table(&self) -> String {
        let mut output = String::new();

        output.push_str("\n┌─────────────────────────────────────────────────────────────┐\n");
        output.push_str("│ Pre-Flight Checks                                           │\n");
        output.push_str("├─────────────────────────────────────────────────────────────┤\n");

        for check in &self.checks {
            let status = if check.passed { "✓" } else { "✗" };
            output.push_str(&format!(
                "│ {} {:12} {:44} │\n",
                status,
                check.name,
                truncate(&check.message, 44)
            ));
        }

        output.push_str("├─────────────────────────────────────────────────────────────┤\n");
        output.push_str(&format!(
            "│ Result: {:52} │\n",
            if self.passed { "READY" } else { "BLOCKED" }
        ));
        output.push_str("└─────────────────────────────────────────────────────────────┘\n");

        output
    }
}

/// Truncate to `max` characters. Counts chars, not bytes, so multibyte
/// error messages never split a char boundary.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preflight_check_constructors() {
        let pass = PreflightCheck::pass("Portal", "ok");
        assert!(pass.passed);

        let fail = PreflightCheck::fail("Chrome", "not found");
        assert!(!fail.passed);
    }

    #[test]
    fn test_result_table_marks_blocked() {
        let result = PreflightResult {
            passed: false,
            checks: vec![PreflightCheck::fail("Portal", "connection refused")],
            message: "0/1 checks passed. Some issues found.".to_string(),
        };

        let table = result.format_table();
        assert!(table.contains("BLOCKED"));
        assert!(table.contains("✗"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long message", 10), "this is...");
    }

    #[test]
    fn test_truncate_multibyte() {
        let long = format!("Connection refused to http://ポータル{}", "あ".repeat(40));
        let truncated = truncate(&long, 44);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 44);
    }
}
