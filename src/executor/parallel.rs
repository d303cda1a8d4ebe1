//! Parallel check execution
//!
//! Runs checks concurrently, each in its own browser session so that
//! tab state and client-side redirects never bleed between checks.

#![allow(dead_code)]

use anyhow::Result;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use crate::browser::{BrowserOptions, BrowserSession};
use crate::checks::{self, SettleTiming};
use crate::models::{CheckCase, CheckResult, CheckStatus, RoundSummary};

/// Parallel check executor. Concurrency is capped by a semaphore so a
/// large catalog does not fork an unbounded number of Chrome processes.
pub struct ParallelExecutor {
    max_concurrent: usize,
    browser_options: BrowserOptions,
    timing: SettleTiming,
}

impl ParallelExecutor {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
            browser_options: BrowserOptions::default(),
            timing: SettleTiming::default(),
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

    /// Run the given checks concurrently against one base URL
    pub async fn run_checks_parallel(
        &self,
        base_url: &str,
        check_cases: Vec<CheckCase>,
    ) -> Result<Vec<CheckResult>> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let base_url = base_url.to_string();

        let order = check_cases.clone();
        let mut handles = Vec::new();

        for check in check_cases {
            let semaphore = semaphore.clone();
            let base_url = base_url.clone();
            let options = self.browser_options.clone();
            let timing = self.timing;

            let handle = tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire().await else {
                    return CheckResult::error(check, "Executor shut down");
                };

                debug!("Starting parallel execution of {}", check);

                // Isolated session per check
                let session = match BrowserSession::launch(&options).await {
                    Ok(s) => s,
                    Err(e) => {
                        error!("{}: browser launch failed: {}", check, e);
                        return CheckResult::error(check, format!("Browser launch failed: {e}"));
                    }
                };

                let result = match checks::run_check(check, &session, &base_url, timing).await {
                    Ok(r) => r,
                    Err(e) => CheckResult::error(check, e.to_string()),
                };

                session.close().await;
                result
            });

            handles.push(handle);
        }

        let joined = join_all(handles).await;
        Ok(recover_joined(joined, &order))
    }

    /// Run the full catalog in parallel
    pub async fn run_all_parallel(&self, base_url: &str) -> Result<RoundSummary> {
        info!(
            "Running all checks in parallel (max {} concurrent) against {}",
            self.max_concurrent, base_url
        );

        let start = Instant::now();
        let results = self
            .run_checks_parallel(base_url, CheckCase::all())
            .await?;

        // Restore catalog order after concurrent completion
        let mut sorted_results = results;
        sorted_results.sort_by_key(|r| r.check.number());

        let summary = RoundSummary::new(1, base_url, sorted_results);

        info!(
            "Parallel execution completed in {}ms - Pass: {}/{} ({:.1}%)",
            start.elapsed().as_millis(),
            summary.passed,
            summary.total,
            summary.pass_rate()
        );

        Ok(summary)
    }
}

impl Default for ParallelExecutor {
    fn default() -> Self {
        Self::new(4)
    }
}

/// Pair joined task outcomes with their checks. A task that panicked or
/// was cancelled becomes an Error result, so every scheduled check still
/// appears in the round summary.
fn recover_joined(
    joined: Vec<std::result::Result<CheckResult, tokio::task::JoinError>>,
    checks: &[CheckCase],
) -> Vec<CheckResult> {
    joined
        .into_iter()
        .zip(checks.iter().copied())
        .map(|(outcome, check)| match outcome {
            Ok(result) => result,
            Err(e) => {
                error!("{}: task aborted: {}", check, e);
                CheckResult::error(check, format!("Check task aborted: {e}"))
            }
        })
        .collect()
}

/// Batch runner for multiple rounds of parallel checks
pub struct BatchRunner {
    executor: ParallelExecutor,
    rounds: u32,
}

impl BatchRunner {
    pub fn new(max_concurrent: usize, rounds: u32) -> Self {
        Self {
            executor: ParallelExecutor::new(max_concurrent),
            rounds,
        }
    }

    pub fn with_browser_options(mut self, options: BrowserOptions) -> Self {
        self.executor = self.executor.with_browser_options(options);
        self
    }

    pub fn with_timing(mut self, timing: SettleTiming) -> Self {
        self.executor = self.executor.with_timing(timing);
        self
    }

    /// Run multiple rounds of parallel checks
    pub async fn run_rounds(&self, base_url: &str) -> Result<Vec<RoundSummary>> {
        info!(
            "Running {} rounds of parallel checks against {}",
            self.rounds, base_url
        );

        let mut summaries = Vec::new();

        for round in 1..=self.rounds {
            info!("=== Round {}/{} ===", round, self.rounds);

            let results = self
                .executor
                .run_checks_parallel(base_url, CheckCase::all())
                .await?;

            let mut sorted_results = results;
            sorted_results.sort_by_key(|r| r.check.number());

            let summary = RoundSummary::new(round, base_url, sorted_results);

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

    /// Aggregate results across multiple rounds
    pub fn aggregate_results(summaries: &[RoundSummary]) -> AggregateResult {
        let total_rounds = summaries.len() as u32;
        let mut check_stats: HashMap<CheckCase, CheckStats> = HashMap::new();

        for summary in summaries {
            for result in &summary.results {
                let stats = check_stats.entry(result.check).or_default();

                match result.status {
                    CheckStatus::Pass => stats.passes += 1,
                    CheckStatus::Fail => stats.failures += 1,
                    CheckStatus::Skip => stats.skips += 1,
                    CheckStatus::Error => stats.errors += 1,
                }
                stats.total_duration_ms += result.duration_ms;
            }
        }

        let check_pass_rates: HashMap<CheckCase, f64> = check_stats
            .iter()
            .map(|(check, stats)| {
                let total = stats.passes + stats.failures + stats.errors;
                let rate = if total > 0 {
                    (stats.passes as f64 / total as f64) * 100.0
                } else {
                    0.0
                };
                (*check, rate)
            })
            .collect();

        let overall_pass_rate = if summaries.is_empty() {
            0.0
        } else {
            summaries.iter().map(|s| s.pass_rate()).sum::<f64>() / summaries.len() as f64
        };

        AggregateResult {
            total_rounds,
            check_stats,
            check_pass_rates,
            overall_pass_rate,
        }
    }
}

/// Per-check statistics across rounds
#[derive(Clone, Debug, Default)]
pub struct CheckStats {
    pub passes: u32,
    pub failures: u32,
    pub skips: u32,
    pub errors: u32,
    pub total_duration_ms: u64,
}

impl CheckStats {
    pub fn avg_duration_ms(&self) -> u64 {
        let total = self.passes + self.failures + self.errors;
        if total > 0 {
            self.total_duration_ms / total as u64
        } else {
            0
        }
    }
}

/// Aggregate results across multiple smoke rounds
#[derive(Clone, Debug)]
pub struct AggregateResult {
    pub total_rounds: u32,
    pub check_stats: HashMap<CheckCase, CheckStats>,
    pub check_pass_rates: HashMap<CheckCase, f64>,
    pub overall_pass_rate: f64,
}

impl AggregateResult {
    /// Checks sorted by pass rate, lowest first
    pub fn flaky_checks(&self) -> Vec<(CheckCase, f64)> {
        let mut checks: Vec<_> = self
            .check_pass_rates
            .iter()
            .map(|(check, rate)| (*check, *rate))
            .collect();
        checks.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.number().cmp(&b.0.number()))
        });
        checks
    }

    /// Checks that passed in every round
    pub fn stable_checks(&self) -> Vec<CheckCase> {
        self.check_pass_rates
            .iter()
            .filter(|(_, rate)| **rate >= 100.0)
            .map(|(check, _)| *check)
            .collect()
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_parallel_executor_creation() {
        let executor = ParallelExecutor::new(8);
        assert_eq!(executor.max_concurrent, 8);
    }

    #[test]
    fn test_concurrency_floor() {
        let executor = ParallelExecutor::new(0);
        assert_eq!(executor.max_concurrent, 1);
    }

    #[test]
    fn test_batch_runner_creation() {
        let runner = BatchRunner::new(4, 10);
        assert_eq!(runner.rounds, 10);
    }

    #[test]
    fn test_aggregate_results() {
        let results1 = vec![
            CheckResult::pass(CheckCase::VoteHeadsRoute, 100),
            CheckResult::fail(CheckCase::ImportRoute, 50, "landed on /500"),
        ];
        let results2 = vec![
            CheckResult::pass(CheckCase::VoteHeadsRoute, 120),
            CheckResult::pass(CheckCase::ImportRoute, 60),
        ];

        let summaries = vec![
            RoundSummary::new(1, "http://localhost:5173", results1),
            RoundSummary::new(2, "http://localhost:5173", results2),
        ];

        let aggregate = BatchRunner::aggregate_results(&summaries);
        assert_eq!(aggregate.total_rounds, 2);
        assert_eq!(
            aggregate.check_pass_rates.get(&CheckCase::VoteHeadsRoute),
            Some(&100.0)
        );
        assert_eq!(
            aggregate.check_pass_rates.get(&CheckCase::ImportRoute),
            Some(&50.0)
        );
    }

    #[tokio::test]
    async fn test_panicked_task_becomes_error_result() {
        let handle = tokio::spawn(async { panic!("lost the browser") });
        let join_err = handle.await.expect_err("task should panic");

        let results = recover_joined(
            vec![
                Ok(CheckResult::pass(CheckCase::VoteHeadsRoute, 10)),
                Err(join_err),
            ],
            &[CheckCase::VoteHeadsRoute, CheckCase::AttachmentsRoute],
        );

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, CheckStatus::Pass);
        assert_eq!(results[1].status, CheckStatus::Error);
        assert_eq!(results[1].check, CheckCase::AttachmentsRoute);
    }

    #[test]
    fn test_flaky_checks_sorted_lowest_first() {
        let summaries = vec![
            RoundSummary::new(
                1,
                "http://localhost:5173",
                vec![
                    CheckResult::pass(CheckCase::VoteHeadsRoute, 100),
                    CheckResult::fail(CheckCase::LoginRender, 80, "blank page"),
                ],
            ),
            RoundSummary::new(
                2,
                "http://localhost:5173",
                vec![
                    CheckResult::pass(CheckCase::VoteHeadsRoute, 110),
                    CheckResult::pass(CheckCase::LoginRender, 90),
                ],
            ),
        ];

        let aggregate = BatchRunner::aggregate_results(&summaries);
        let flaky = aggregate.flaky_checks();
        assert_eq!(flaky[0].0, CheckCase::LoginRender);
        assert_eq!(flaky[0].1, 50.0);
    }
}
