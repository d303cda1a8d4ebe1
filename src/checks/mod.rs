//! Smoke check implementations
//!
//! The two operations every configured route is verified with:
//!
//! - Routing checks: navigate, let client-side redirects settle, and
//!   require the final URL to carry the route's own segment or the
//!   login segment.
//! - Render checks: navigate independently and require the document to
//!   expose a visible root-level element.

#![allow(dead_code)]

mod render;
mod routes;

pub use render::PageRenderCheck;
pub use routes::{RouteRedirectCheck, SmokeSuite};

use anyhow::Result;
use std::time::Duration;
use tracing::error;

use crate::browser::BrowserSession;
use crate::models::{CheckCase, CheckResult, RouteCase};

/// Timing knobs shared by all checks
#[derive(Clone, Copy, Debug)]
pub struct SettleTiming {
    /// Upper bound for the post-navigation URL settle wait
    pub settle_wait: Duration,
    /// Interval between URL/visibility polls
    pub poll_interval: Duration,
    /// Upper bound for the root element to become visible
    pub visibility_timeout: Duration,
}

impl Default for SettleTiming {
    fn default() -> Self {
        Self {
            settle_wait: Duration::from_secs(5),
            poll_interval: Duration::from_millis(100),
            visibility_timeout: Duration::from_secs(10),
        }
    }
}

impl SettleTiming {
    pub fn from_millis(settle_ms: u64, poll_ms: u64, visibility_ms: u64) -> Self {
        Self {
            settle_wait: Duration::from_millis(settle_ms),
            poll_interval: Duration::from_millis(poll_ms),
            visibility_timeout: Duration::from_millis(visibility_ms),
        }
    }
}

/// Run a single check against one browser session
pub async fn run_check(
    check: CheckCase,
    session: &BrowserSession,
    base_url: &str,
    timing: SettleTiming,
) -> Result<CheckResult> {
    let route = RouteCase::for_route(check.route());

    match check.category() {
        "Routing" => {
            RouteRedirectCheck::new(base_url, route, check)
                .with_timing(timing)
                .run(session)
                .await
        }
        _ => {
            PageRenderCheck::new(base_url, route, check)
                .with_timing(timing)
                .run(session)
                .await
        }
    }
}

/// Downgrade an infrastructure failure (browser died, navigation never
/// committed) to an Error result for that check, so one broken
/// navigation cannot abort the rest of the round.
pub fn recover_check(check: CheckCase, outcome: Result<CheckResult>) -> CheckResult {
    match outcome {
        Ok(result) => result,
        Err(e) => {
            error!("{} failed with error: {}", check, e);
            CheckResult::error(check, e.to_string())
        }
    }
}

/// Run the full check catalog sequentially on one session
pub async fn run_all_checks(
    session: &BrowserSession,
    base_url: &str,
    timing: SettleTiming,
    skip_checks: &[u8],
) -> Vec<CheckResult> {
    SmokeSuite::new(base_url)
        .with_timing(timing)
        .with_skip_checks(skip_checks.to_vec())
        .run_all(session)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CheckStatus;

    #[test]
    fn test_default_timing() {
        let timing = SettleTiming::default();
        assert_eq!(timing.settle_wait, Duration::from_secs(5));
        assert_eq!(timing.poll_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_timing_from_millis() {
        let timing = SettleTiming::from_millis(2000, 50, 8000);
        assert_eq!(timing.settle_wait, Duration::from_secs(2));
        assert_eq!(timing.poll_interval, Duration::from_millis(50));
        assert_eq!(timing.visibility_timeout, Duration::from_secs(8));
    }

    #[test]
    fn test_recover_check_downgrades_errors() {
        let result = recover_check(
            CheckCase::ImportRoute,
            Err(anyhow::anyhow!("Navigation to /dashboard/import timed out")),
        );
        assert_eq!(result.check, CheckCase::ImportRoute);
        assert_eq!(result.status, CheckStatus::Error);
        assert!(result.message.as_deref().unwrap_or("").contains("timed out"));
    }

    #[test]
    fn test_recover_check_passes_results_through() {
        let result = recover_check(
            CheckCase::LoginRender,
            Ok(CheckResult::pass(CheckCase::LoginRender, 42)),
        );
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.duration_ms, 42);
    }
}
