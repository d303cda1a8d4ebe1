//! Sequential check runner
//!
//! Drives the smoke catalog through a single browser session, one
//! check at a time.

#![allow(dead_code)]

use anyhow::Result;
use std::time::Instant;
use tracing::info;

use crate::browser::{BrowserOptions, BrowserSession};
use crate::checks::{self, SettleTiming};
use crate::models::{CheckCase, CheckResult, RoundSummary};

/// Sequential runner: one browser session, checks in catalog order
pub struct CheckRunner {
    base_url: String,
    browser_options: BrowserOptions,
    timing: SettleTiming,
    skip_checks: Vec<u8>,
}

impl CheckRunner {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            browser_options: BrowserOptions::default(),
            timing: SettleTiming::default(),
            skip_checks: Vec::new(),
        }
    }

    pub fn with_browser_options(mut self, options: BrowserOptions) -> Self {
        self.browser_options = options;
        self
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

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a single check. Infrastructure failures (browser died,
    /// navigation never committed) become Error results rather than
    /// aborting the round.
    pub async fn run_check(&self, session: &BrowserSession, check: CheckCase) -> CheckResult {
        if self.skip_checks.contains(&check.number()) {
            return CheckResult::skip(check, "Skipped by configuration");
        }

        let outcome = checks::run_check(check, session, &self.base_url, self.timing).await;
        checks::recover_check(check, outcome)
    }

    /// Run the whole catalog once
    pub async fn run_all(&self) -> Result<RoundSummary> {
        info!("Starting smoke round against {}", self.base_url);

        let start = Instant::now();
        let session = BrowserSession::launch(&self.browser_options).await?;

        let results =
            checks::run_all_checks(&session, &self.base_url, self.timing, &self.skip_checks)
                .await;

        session.close().await;

        let summary = RoundSummary::new(1, &self.base_url, results);

        info!(
            "Smoke round completed in {}ms - Pass: {}/{} ({:.1}%)",
            start.elapsed().as_millis(),
            summary.passed,
            summary.total,
            summary.pass_rate()
        );

        Ok(summary)
    }

    /// Run a selected subset of checks once
    pub async fn run_checks(&self, checks: &[CheckCase]) -> Result<RoundSummary> {
        info!(
            "Running {} selected checks against {}",
            checks.len(),
            self.base_url
        );

        let session = BrowserSession::launch(&self.browser_options).await?;

        let mut results = Vec::new();
        for &check in checks {
            let result = self.run_check(&session, check).await;
            info!("  {}", result);
            results.push(result);
        }

        session.close().await;

        Ok(RoundSummary::new(1, &self.base_url, results))
    }

    /// Run the catalog for multiple rounds, each in a fresh browser
    pub async fn run_rounds(&self, num_rounds: u32) -> Result<Vec<RoundSummary>> {
        info!("Running {} rounds against {}", num_rounds, self.base_url);

        let mut summaries = Vec::new();

        for round in 1..=num_rounds {
            info!("=== Round {}/{} ===", round, num_rounds);

            let session = BrowserSession::launch(&self.browser_options).await?;

            let results =
                checks::run_all_checks(&session, &self.base_url, self.timing, &self.skip_checks)
                    .await;

            session.close().await;

            let summary = RoundSummary::new(round, &self.base_url, results);

            info!(
                "Round {} completed: {}/{} passed ({:.1}%)",
                round,
                summary.passed,
                summary.total,
                summary.pass_rate()
            );

            summaries.push(summary);
        }

        Ok(summaries)
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_runner_builder() {
        let runner = CheckRunner::new("http://localhost:5173")
            .with_timing(SettleTiming::from_millis(1000, 50, 5000))
            .with_skip_checks(vec![7, 8]);

        assert_eq!(runner.base_url(), "http://localhost:5173");
        assert_eq!(runner.skip_checks, vec![7, 8]);
    }
}
