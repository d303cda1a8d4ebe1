//! Results storage and retrieval
//!
//! Stores each smoke run as a JSON file, grouped by portal host, so
//! pass rates can be compared across runs.

#![allow(dead_code)]

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::{CheckStatus, RoundSummary};

/// One persisted smoke run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredSmokeRun {
    /// Unique run ID
    pub id: String,

    /// Portal base URL the run targeted
    pub base_url: String,

    /// Timestamp when the run started
    pub started_at: DateTime<Utc>,

    /// Timestamp when the run completed
    pub completed_at: DateTime<Utc>,

    /// Number of rounds
    pub rounds: u32,

    /// Round summaries
    pub summaries: Vec<RoundSummary>,

    /// Aggregate statistics across rounds
    pub aggregate: Option<AggregateStats>,

    /// Environment info
    pub environment: EnvironmentInfo,
}

/// Aggregate statistics across all rounds of a run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Average pass rate (0.0 - 1.0)
    pub avg_pass_rate: f64,
    pub min_pass_rate: f64,
    pub max_pass_rate: f64,

    /// Average duration per round
    pub avg_duration_ms: u64,
    pub total_duration_ms: u64,

    /// Per-check statistics keyed by check name
    pub check_stats: BTreeMap<String, StoredCheckStats>,
}

/// Statistics for a single check across rounds
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredCheckStats {
    pub pass_count: u32,
    pub fail_count: u32,
    pub pass_rate: f64,
    pub avg_duration_ms: u64,
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
}

/// Environment information
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    pub os: String,
    pub arch: String,
    pub tool_version: String,
}

impl Default for EnvironmentInfo {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl StoredSmokeRun {
    /// Create a new stored run for a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            id: generate_run_id(),
            base_url: base_url.into(),
            started_at: Utc::now(),
            completed_at: Utc::now(),
            rounds: 0,
            summaries: Vec::new(),
            aggregate: None,
            environment: EnvironmentInfo::default(),
        }
    }

    /// Add a round summary
    pub fn add_round(&mut self, summary: RoundSummary) {
        self.rounds = self.rounds.max(summary.round);
        self.summaries.push(summary);
        self.completed_at = Utc::now();
    }

    /// Calculate aggregate statistics from the recorded rounds
    pub fn calculate_aggregate(&mut self) {
        if self.summaries.is_empty() {
            return;
        }

        let mut pass_rates: Vec<f64> = Vec::new();
        let mut durations: Vec<u64> = Vec::new();
        let mut check_results: BTreeMap<String, Vec<(bool, u64)>> = BTreeMap::new();

        for summary in &self.summaries {
            pass_rates.push(summary.pass_rate() / 100.0);
            durations.push(summary.total_duration_ms);

            for result in &summary.results {
                check_results
                    .entry(result.check.name().to_string())
                    .or_default()
                    .push((result.status == CheckStatus::Pass, result.duration_ms));
            }
        }

        let avg_pass_rate = pass_rates.iter().sum::<f64>() / pass_rates.len() as f64;
        let min_pass_rate = pass_rates.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_pass_rate = pass_rates.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let total_duration_ms: u64 = durations.iter().sum();
        let avg_duration_ms = total_duration_ms / durations.len() as u64;

        let mut check_stats: BTreeMap<String, StoredCheckStats> = BTreeMap::new();
        for (name, results) in check_results {
            let pass_count = results.iter().filter(|(p, _)| *p).count() as u32;
            let fail_count = results.len() as u32 - pass_count;
            let pass_rate = pass_count as f64 / results.len() as f64;

            let durs: Vec<u64> = results.iter().map(|(_, d)| *d).collect();
            let avg_dur = durs.iter().sum::<u64>() / durs.len() as u64;
            let min_dur = *durs.iter().min().unwrap_or(&0);
            let max_dur = *durs.iter().max().unwrap_or(&0);

            check_stats.insert(
                name,
                StoredCheckStats {
                    pass_count,
                    fail_count,
                    pass_rate,
                    avg_duration_ms: avg_dur,
                    min_duration_ms: min_dur,
                    max_duration_ms: max_dur,
                },
            );
        }

        self.aggregate = Some(AggregateStats {
            avg_pass_rate,
            min_pass_rate,
            max_pass_rate,
            avg_duration_ms,
            total_duration_ms,
            check_stats,
        });
    }
}

/// Generate unique run ID from the wall clock and process id
fn generate_run_id() -> String {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S%3f");
    format!("{}_{}", timestamp, std::process::id())
}

/// Directory key for a base URL: host and port, filesystem-safe
fn host_key(base_url: &str) -> String {
    let stripped = base_url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');

    stripped
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' {
            c
        } else {
            '_'
        })
        .collect::<String>()
        .to_lowercase()
}

/// Results storage manager
pub struct ResultsStorage {
    base_dir: PathBuf,
}

impl ResultsStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Create with the default directory under the user data dir
    pub fn default_dir() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("portal-smoke")
            .join("results");
        Ok(Self::new(base_dir))
    }

    fn host_dir(&self, base_url: &str) -> PathBuf {
        self.base_dir.join(host_key(base_url))
    }

    fn run_path(&self, base_url: &str, run_id: &str) -> PathBuf {
        self.host_dir(base_url).join(format!("{run_id}.json"))
    }

    /// Save a smoke run
    pub fn save(&self, run: &StoredSmokeRun) -> Result<PathBuf> {
        let host_dir = self.host_dir(&run.base_url);
        fs::create_dir_all(&host_dir)?;

        let path = self.run_path(&run.base_url, &run.id);
        let file = File::create(&path).context("Failed to create results file")?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, run).context("Failed to write results")?;

        info!("Saved smoke results to {}", path.display());
        Ok(path)
    }

    /// Load a specific run
    pub fn load(&self, base_url: &str, run_id: &str) -> Result<StoredSmokeRun> {
        let path = self.run_path(base_url, run_id);
        self.load_from_path(&path)
    }

    /// Load all runs for a host, newest first
    pub fn load_host(&self, base_url: &str) -> Result<Vec<StoredSmokeRun>> {
        let host_dir = self.host_dir(base_url);
        if !host_dir.exists() {
            return Ok(Vec::new());
        }

        let mut runs = Vec::new();
        for entry in fs::read_dir(&host_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().map(|e| e == "json").unwrap_or(false) {
                match self.load_from_path(&path) {
                    Ok(run) => runs.push(run),
                    Err(e) => {
                        debug!("Failed to load {}: {}", path.display(), e);
                    }
                }
            }
        }

        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(runs)
    }

    pub fn load_from_path(&self, path: &Path) -> Result<StoredSmokeRun> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open results file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).context("Failed to parse results")
    }

    /// List all hosts with stored results
    pub fn list_hosts(&self) -> Result<Vec<String>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut hosts = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    hosts.push(name.to_string());
                }
            }
        }

        hosts.sort();
        Ok(hosts)
    }

    /// List all runs for a host, newest first
    pub fn list_runs(&self, base_url: &str) -> Result<Vec<RunInfo>> {
        let runs = self.load_host(base_url)?;
        Ok(runs
            .into_iter()
            .map(|run| RunInfo {
                id: run.id,
                base_url: run.base_url,
                started_at: run.started_at,
                rounds: run.rounds,
                pass_rate: run
                    .aggregate
                    .as_ref()
                    .map(|a| a.avg_pass_rate)
                    .unwrap_or(0.0),
            })
            .collect())
    }

    /// Get the latest run for a host
    pub fn latest(&self, base_url: &str) -> Result<Option<StoredSmokeRun>> {
        let runs = self.load_host(base_url)?;
        Ok(runs.into_iter().next())
    }

    /// Delete a run
    pub fn delete(&self, base_url: &str, run_id: &str) -> Result<()> {
        let path = self.run_path(base_url, run_id);
        if path.exists() {
            fs::remove_file(&path)?;
            info!("Deleted results: {}", path.display());
        }
        Ok(())
    }
}

/// Brief run information
#[derive(Clone, Debug)]
pub struct RunInfo {
    pub id: String,
    pub base_url: String,
    pub started_at: DateTime<Utc>,
    pub rounds: u32,
    pub pass_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CheckCase, CheckResult};
    use tempfile::tempdir;

    #[test]
    fn test_host_key() {
        assert_eq!(host_key("http://localhost:5173"), "localhost_5173");
        assert_eq!(host_key("https://portal.school.ke/"), "portal.school.ke");
    }

    #[test]
    fn test_stored_run_aggregate() {
        let mut run = StoredSmokeRun::new("http://localhost:5173");
        run.add_round(RoundSummary::new(
            1,
            "http://localhost:5173",
            vec![
                CheckResult::pass(CheckCase::VoteHeadsRoute, 100),
                CheckResult::fail(CheckCase::ImportRender, 50, "blank page"),
            ],
        ));
        run.add_round(RoundSummary::new(
            2,
            "http://localhost:5173",
            vec![
                CheckResult::pass(CheckCase::VoteHeadsRoute, 120),
                CheckResult::pass(CheckCase::ImportRender, 70),
            ],
        ));

        run.calculate_aggregate();

        let aggregate = run.aggregate.expect("aggregate should be set");
        assert_eq!(aggregate.check_stats.len(), 2);
        assert_eq!(
            aggregate.check_stats["Vote Heads Route"].pass_rate,
            1.0
        );
        assert_eq!(aggregate.check_stats["Import Render"].pass_rate, 0.5);
        assert_eq!(run.rounds, 2);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = ResultsStorage::new(dir.path());

        let mut run = StoredSmokeRun::new("http://localhost:5173");
        run.add_round(RoundSummary::new(
            1,
            "http://localhost:5173",
            vec![CheckResult::pass(CheckCase::LoginRender, 90)],
        ));
        run.calculate_aggregate();

        storage.save(&run).unwrap();

        let loaded = storage.load("http://localhost:5173", &run.id).unwrap();
        assert_eq!(loaded.id, run.id);
        assert_eq!(loaded.summaries.len(), 1);

        let latest = storage.latest("http://localhost:5173").unwrap();
        assert!(latest.is_some());

        let hosts = storage.list_hosts().unwrap();
        assert_eq!(hosts, vec!["localhost_5173".to_string()]);
    }

    #[test]
    fn test_run_ids_are_unique() {
        let id1 = generate_run_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = generate_run_id();
        assert_ne!(id1, id2);
    }
}
