//! Check result models
//!
//! Defines the check catalog, statuses, and round summaries.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::fmt;

use super::route::Route;

/// The 8 smoke checks run against the portal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCase {
    // Routing checks: final URL carries the route segment or "login"
    VoteHeadsRoute,
    AttachmentsRoute,
    ImportRoute,
    DashboardGuard,

    // Render checks: document exposes a visible root element
    VoteHeadsRender,
    AttachmentsRender,
    ImportRender,
    LoginRender,
}

impl CheckCase {
    /// Get check number (1-8)
    pub fn number(&self) -> u8 {
        match self {
            CheckCase::VoteHeadsRoute => 1,
            CheckCase::VoteHeadsRender => 2,
            CheckCase::AttachmentsRoute => 3,
            CheckCase::AttachmentsRender => 4,
            CheckCase::ImportRoute => 5,
            CheckCase::ImportRender => 6,
            CheckCase::DashboardGuard => 7,
            CheckCase::LoginRender => 8,
        }
    }

    /// Get check name
    pub fn name(&self) -> &'static str {
        match self {
            CheckCase::VoteHeadsRoute => "Vote Heads Route",
            CheckCase::VoteHeadsRender => "Vote Heads Render",
            CheckCase::AttachmentsRoute => "Attachments Route",
            CheckCase::AttachmentsRender => "Attachments Render",
            CheckCase::ImportRoute => "Import Route",
            CheckCase::ImportRender => "Import Render",
            CheckCase::DashboardGuard => "Dashboard Guard",
            CheckCase::LoginRender => "Login Render",
        }
    }

    /// Get check category
    pub fn category(&self) -> &'static str {
        match self {
            CheckCase::VoteHeadsRoute
            | CheckCase::AttachmentsRoute
            | CheckCase::ImportRoute
            | CheckCase::DashboardGuard => "Routing",
            _ => "Render",
        }
    }

    /// The route this check navigates to
    pub fn route(&self) -> Route {
        match self {
            CheckCase::VoteHeadsRoute | CheckCase::VoteHeadsRender => Route::VoteHeads,
            CheckCase::AttachmentsRoute | CheckCase::AttachmentsRender => Route::Attachments,
            CheckCase::ImportRoute | CheckCase::ImportRender => Route::Import,
            CheckCase::DashboardGuard => Route::DashboardHome,
            CheckCase::LoginRender => Route::Login,
        }
    }

    /// Get all checks in execution order
    pub fn all() -> Vec<CheckCase> {
        vec![
            CheckCase::VoteHeadsRoute,
            CheckCase::VoteHeadsRender,
            CheckCase::AttachmentsRoute,
            CheckCase::AttachmentsRender,
            CheckCase::ImportRoute,
            CheckCase::ImportRender,
            CheckCase::DashboardGuard,
            CheckCase::LoginRender,
        ]
    }

    /// Checks that exercise a given route
    pub fn for_route(route: Route) -> Vec<CheckCase> {
        Self::all().into_iter().filter(|c| c.route() == route).collect()
    }

    /// Parse from check number
    pub fn from_number(n: u8) -> Option<CheckCase> {
        match n {
            1 => Some(CheckCase::VoteHeadsRoute),
            2 => Some(CheckCase::VoteHeadsRender),
            3 => Some(CheckCase::AttachmentsRoute),
            4 => Some(CheckCase::AttachmentsRender),
            5 => Some(CheckCase::ImportRoute),
            6 => Some(CheckCase::ImportRender),
            7 => Some(CheckCase::DashboardGuard),
            8 => Some(CheckCase::LoginRender),
            _ => None,
        }
    }
}

impl fmt::Display for CheckCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Check {}: {}", self.number(), self.name())
    }
}

/// Check execution status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
    Skip,
    Error,
}

impl CheckStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "✓",
            CheckStatus::Fail => "✗",
            CheckStatus::Skip => "○",
            CheckStatus::Error => "!",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CheckStatus::Pass)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Pass => write!(f, "PASS"),
            CheckStatus::Fail => write!(f, "FAIL"),
            CheckStatus::Skip => write!(f, "SKIP"),
            CheckStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Result of a single check execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckResult {
    pub check: CheckCase,
    pub status: CheckStatus,
    pub duration_ms: u64,
    /// URL the browser settled on, when navigation got that far
    pub final_url: Option<String>,
    pub message: Option<String>,
}

impl CheckResult {
    pub fn pass(check: CheckCase, duration_ms: u64) -> Self {
        Self {
            check,
            status: CheckStatus::Pass,
            duration_ms,
            final_url: None,
            message: None,
        }
    }

    pub fn fail(check: CheckCase, duration_ms: u64, message: impl Into<String>) -> Self {
        Self {
            check,
            status: CheckStatus::Fail,
            duration_ms,
            final_url: None,
            message: Some(message.into()),
        }
    }

    pub fn skip(check: CheckCase, reason: impl Into<String>) -> Self {
        Self {
            check,
            status: CheckStatus::Skip,
            duration_ms: 0,
            final_url: None,
            message: Some(reason.into()),
        }
    }

    pub fn error(check: CheckCase, error: impl Into<String>) -> Self {
        Self {
            check,
            status: CheckStatus::Error,
            duration_ms: 0,
            final_url: None,
            message: Some(error.into()),
        }
    }

    pub fn with_final_url(mut self, url: impl Into<String>) -> Self {
        self.final_url = Some(url.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}ms]",
            self.status.symbol(),
            self.check,
            self.duration_ms
        )?;
        if let Some(msg) = &self.message {
            write!(f, " - {msg}")?;
        }
        Ok(())
    }
}

/// Summary of one smoke round
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    pub base_url: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub total_duration_ms: u64,
    pub results: Vec<CheckResult>,
}

impl RoundSummary {
    pub fn new(round: u32, base_url: impl Into<String>, results: Vec<CheckResult>) -> Self {
        let total = results.len();
        let passed = results
            .iter()
            .filter(|r| r.status == CheckStatus::Pass)
            .count();
        let failed = results
            .iter()
            .filter(|r| r.status == CheckStatus::Fail)
            .count();
        let skipped = results
            .iter()
            .filter(|r| r.status == CheckStatus::Skip)
            .count();
        let errors = results
            .iter()
            .filter(|r| r.status == CheckStatus::Error)
            .count();
        let total_duration_ms = results.iter().map(|r| r.duration_ms).sum();

        Self {
            round,
            base_url: base_url.into(),
            total,
            passed,
            failed,
            skipped,
            errors,
            total_duration_ms,
            results,
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    pub fn is_all_passed(&self) -> bool {
        self.passed == self.total
    }
}

impl fmt::Display for RoundSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Round {} - {}", self.round, self.base_url)?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for result in &self.results {
            writeln!(f, "  {result}")?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Skip: {} | Error: {}",
            self.total, self.passed, self.failed, self.skipped, self.errors
        )?;
        writeln!(
            f,
            "Pass Rate: {:.1}% | Duration: {}ms",
            self.pass_rate(),
            self.total_duration_ms
        )
    }
}
