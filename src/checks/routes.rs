//! Route-or-redirect checks
//!
//! Verifies that navigating to a dashboard route lands either on the
//! route's own page or on the login page, and on nothing else.

#![allow(dead_code)]

use anyhow::Result;
use tracing::{debug, info};

use crate::browser::BrowserSession;
use crate::models::{CheckCase, CheckResult, RouteCase};
use crate::utils::Timer;

use super::SettleTiming;

/// Checks that a route's final URL satisfies the route-or-redirect
/// contract after client-side redirects have settled.
#[derive(Clone, Debug)]
pub struct RouteRedirectCheck {
    pub base_url: String,
    pub route: RouteCase,
    pub check: CheckCase,
    timing: SettleTiming,
}

impl RouteRedirectCheck {
    pub fn new(base_url: impl Into<String>, route: RouteCase, check: CheckCase) -> Self {
        Self {
            base_url: base_url.into(),
            route,
            check,
            timing: SettleTiming::default(),
        }
    }

    pub fn with_timing(mut self, timing: SettleTiming) -> Self {
        self.timing = timing;
        self
    }

    fn target_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.route.path)
    }

    pub async fn run(&self, session: &BrowserSession) -> Result<CheckResult> {
        info!("Running {}", self.check);
        let timer = Timer::start(self.check.name());

        let page = session.new_page().await?;
        let url = self.target_url();
        debug!("Checking route {}", url);

        let nav = session
            .navigate_settled(&page, &url, self.timing.settle_wait, self.timing.poll_interval)
            .await?;
        debug!("Settled at {} after {}ms", nav.final_url, nav.duration_ms);

        let duration_ms = timer.elapsed_ms();
        page.close().await.ok();

        if self.route.is_expected_or_login_redirect(&nav.final_url) {
            let outcome = if nav.final_url.contains(&self.route.expected_segment) {
                "rendered own page"
            } else {
                "redirected to login"
            };
            Ok(CheckResult::pass(self.check, duration_ms)
                .with_final_url(&nav.final_url)
                .with_message(format!(
                    "{} -> {} ({})",
                    self.route.path, nav.final_url, outcome
                )))
        } else {
            Ok(CheckResult::fail(
                self.check,
                duration_ms,
                format!(
                    "final URL '{}' contains neither '{}' nor '{}'",
                    nav.final_url, self.route.expected_segment, self.route.fallback_segment
                ),
            )
            .with_final_url(nav.final_url))
        }
    }
}

/// Full smoke catalog bundled against one base URL
pub struct SmokeSuite {
    pub base_url: String,
    timing: SettleTiming,
    skip_checks: Vec<u8>,
}

impl SmokeSuite {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timing: SettleTiming::default(),
            skip_checks: Vec::new(),
        }
    }

    pub fn with_timing(mut self, timing: SettleTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Check numbers to skip this run
    pub fn with_skip_checks(mut self, skip: Vec<u8>) -> Self {
        self.skip_checks = skip;
        self
    }

    /// Run every check in catalog order on the given session. Checks are
    /// independent: a failing navigation becomes an Error result for that
    /// check and the rest of the round continues.
    pub async fn run_all(&self, session: &BrowserSession) -> Vec<CheckResult> {
        let mut results = Vec::new();

        for check in CheckCase::all() {
            if self.skip_checks.contains(&check.number()) {
                results.push(CheckResult::skip(check, "Skipped by configuration"));
                continue;
            }

            let outcome = super::run_check(check, session, &self.base_url, self.timing).await;
            let result = super::recover_check(check, outcome);
            info!("  {}", result);
            results.push(result);
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Route;

    #[test]
    fn test_target_url_joins_cleanly() {
        let check = RouteRedirectCheck::new(
            "http://localhost:5173/",
            RouteCase::for_route(Route::VoteHeads),
            CheckCase::VoteHeadsRoute,
        );
        assert_eq!(check.target_url(), "http://localhost:5173/dashboard/vote-heads");
    }

    #[test]
    fn test_target_url_without_trailing_slash() {
        let check = RouteRedirectCheck::new(
            "http://localhost:5173",
            RouteCase::for_route(Route::Import),
            CheckCase::ImportRoute,
        );
        assert_eq!(check.target_url(), "http://localhost:5173/dashboard/import");
    }

    #[test]
    fn test_suite_builder() {
        let suite = SmokeSuite::new("http://localhost:5173")
            .with_timing(SettleTiming::from_millis(1000, 50, 5000))
            .with_skip_checks(vec![7, 8]);
        assert_eq!(suite.base_url, "http://localhost:5173");
        assert_eq!(suite.skip_checks, vec![7, 8]);
    }
}
