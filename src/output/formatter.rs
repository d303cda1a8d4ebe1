//! Output formatters for smoke check results
//!
//! Provides table, JSON, CSV, and summary output formats.

#![allow(dead_code)]

use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

use crate::executor::AggregateResult;
use crate::models::{CheckResult, CheckStatus, RoundSummary};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Csv,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Format a single check result
    pub fn format_result(&self, result: &CheckResult) -> String {
        match self.format {
            OutputFormat::Table => self.format_result_table(result),
            OutputFormat::Json => serde_json::to_string(result).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(result).unwrap_or_default(),
            OutputFormat::Csv => self.format_result_csv(result),
            OutputFormat::Summary => self.format_result_summary(result),
        }
    }

    fn format_result_table(&self, result: &CheckResult) -> String {
        let status_str = if self.colorize {
            match result.status {
                CheckStatus::Pass => "\x1b[32m✓ PASS\x1b[0m",
                CheckStatus::Fail => "\x1b[31m✗ FAIL\x1b[0m",
                CheckStatus::Skip => "\x1b[33m○ SKIP\x1b[0m",
                CheckStatus::Error => "\x1b[31m! ERROR\x1b[0m",
            }
        } else {
            match result.status {
                CheckStatus::Pass => "✓ PASS",
                CheckStatus::Fail => "✗ FAIL",
                CheckStatus::Skip => "○ SKIP",
                CheckStatus::Error => "! ERROR",
            }
        };

        format!(
            "{:2}. {:18} {} [{:>6}ms]",
            result.check.number(),
            result.check.name(),
            status_str,
            result.duration_ms
        )
    }

    fn format_result_csv(&self, result: &CheckResult) -> String {
        format!(
            "{},{},{},{},\"{}\",\"{}\"",
            result.check.number(),
            result.check.name(),
            result.status,
            result.duration_ms,
            result.final_url.as_deref().unwrap_or(""),
            result.message.as_deref().unwrap_or("").replace('"', "\"\"")
        )
    }

    fn format_result_summary(&self, result: &CheckResult) -> String {
        format!(
            "{} {} ({}ms)",
            result.status.symbol(),
            result.check.name(),
            result.duration_ms
        )
    }

    /// Format a round summary
    pub fn format_summary(&self, summary: &RoundSummary) -> String {
        match self.format {
            OutputFormat::Table => self.format_summary_table(summary),
            OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
            OutputFormat::Csv => self.format_summary_csv(summary),
            OutputFormat::Summary => self.format_summary_brief(summary),
        }
    }

    fn format_summary_table(&self, summary: &RoundSummary) -> String {
        let mut output = String::new();

        output.push_str("\n╔══════════════════════════════════════════════════════════════╗\n");
        output.push_str(&format!(
            "║  Round {:3} - {:40}     ║\n",
            summary.round,
            truncate(&summary.base_url, 40)
        ));
        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        for result in &summary.results {
            output.push_str(&format!("║  {}  ║\n", self.format_result_table(result)));
        }

        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        let pass_str = if self.colorize {
            format!("\x1b[32m{}\x1b[0m", summary.passed)
        } else {
            summary.passed.to_string()
        };
        let fail_str = if self.colorize && summary.failed > 0 {
            format!("\x1b[31m{}\x1b[0m", summary.failed)
        } else {
            summary.failed.to_string()
        };

        output.push_str(&format!(
            "║  Total: {:2} | Pass: {} | Fail: {} | Skip: {:2} | Error: {:2}     ║\n",
            summary.total, pass_str, fail_str, summary.skipped, summary.errors
        ));
        output.push_str(&format!(
            "║  Pass Rate: {:5.1}% | Duration: {:6}ms                      ║\n",
            summary.pass_rate(),
            summary.total_duration_ms
        ));
        output.push_str("╚══════════════════════════════════════════════════════════════╝\n");

        output
    }

    fn format_summary_csv(&self, summary: &RoundSummary) -> String {
        let mut output = String::new();
        output.push_str("check_num,check_name,status,duration_ms,final_url,message\n");
        for result in &summary.results {
            output.push_str(&self.format_result_csv(result));
            output.push('\n');
        }
        output
    }

    fn format_summary_brief(&self, summary: &RoundSummary) -> String {
        format!(
            "{} - Round {}: {}/{} passed ({:.1}%) in {}ms",
            summary.base_url,
            summary.round,
            summary.passed,
            summary.total,
            summary.pass_rate(),
            summary.total_duration_ms
        )
    }

    /// Format aggregate results across rounds
    pub fn format_aggregate(&self, aggregate: &AggregateResult, base_url: &str) -> String {
        match self.format {
            OutputFormat::Table => self.format_aggregate_table(aggregate, base_url),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                #[derive(Serialize)]
                struct AggregateJson<'a> {
                    base_url: &'a str,
                    total_rounds: u32,
                    overall_pass_rate: f64,
                    check_pass_rates: HashMap<String, f64>,
                }

                let json = AggregateJson {
                    base_url,
                    total_rounds: aggregate.total_rounds,
                    overall_pass_rate: aggregate.overall_pass_rate,
                    check_pass_rates: aggregate
                        .check_pass_rates
                        .iter()
                        .map(|(k, v)| (k.name().to_string(), *v))
                        .collect(),
                };

                if self.format == OutputFormat::JsonPretty {
                    serde_json::to_string_pretty(&json).unwrap_or_default()
                } else {
                    serde_json::to_string(&json).unwrap_or_default()
                }
            }
            _ => self.format_aggregate_table(aggregate, base_url),
        }
    }

    fn format_aggregate_table(&self, aggregate: &AggregateResult, base_url: &str) -> String {
        let mut output = String::new();

        output.push_str("\n═══════════════════════════════════════════════════════════════\n");
        output.push_str(&format!(
            " Aggregate Results: {} ({} rounds)\n",
            base_url, aggregate.total_rounds
        ));
        output.push_str("═══════════════════════════════════════════════════════════════\n");

        output.push_str(&format!(
            " Overall Pass Rate: {:.1}%\n\n",
            aggregate.overall_pass_rate
        ));

        output.push_str(" Check Pass Rates:\n");
        output.push_str(" ───────────────────────────────────────────────────────────\n");

        let mut checks: Vec<_> = aggregate.check_pass_rates.iter().collect();
        checks.sort_by_key(|(check, _)| check.number());

        for (check, rate) in checks {
            let bar_len = ((*rate / 5.0) as usize).min(20);
            let bar = "█".repeat(bar_len);
            let empty = "░".repeat(20 - bar_len);

            let rate_str = if self.colorize {
                if *rate >= 90.0 {
                    format!("\x1b[32m{rate:5.1}%\x1b[0m")
                } else if *rate >= 50.0 {
                    format!("\x1b[33m{rate:5.1}%\x1b[0m")
                } else {
                    format!("\x1b[31m{rate:5.1}%\x1b[0m")
                }
            } else {
                format!("{rate:5.1}%")
            };

            output.push_str(&format!(
                " {:2}. {:18} {} {} {}\n",
                check.number(),
                check.name(),
                bar,
                empty,
                rate_str
            ));
        }

        output.push_str(" ───────────────────────────────────────────────────────────\n");

        let flaky: Vec<_> = aggregate
            .flaky_checks()
            .into_iter()
            .filter(|(_, r)| *r < 100.0)
            .collect();
        if !flaky.is_empty() {
            output.push_str("\n Flaky Checks (< 100% pass rate):\n");
            for (check, rate) in flaky.iter().take(5) {
                output.push_str(&format!("   - {} ({:.1}%)\n", check.name(), rate));
            }
        }

        output
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

/// Truncate to `max` characters. Counts chars, not bytes, so multibyte
/// URLs and messages never split a char boundary.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Write results to a file
pub fn write_results_to_file(
    path: &str,
    summary: &RoundSummary,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let formatter = ResultFormatter::new(format).no_color();
    let content = formatter.format_summary(summary);

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CheckCase;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("TABLE"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::from_str("unknown"), None);
    }

    #[test]
    fn test_formatter_creation() {
        let formatter = ResultFormatter::new(OutputFormat::Json).no_color();
        assert_eq!(formatter.format, OutputFormat::Json);
        assert!(!formatter.colorize);
    }

    #[test]
    fn test_format_result() {
        let result = CheckResult::pass(CheckCase::VoteHeadsRoute, 100);
        let formatter = ResultFormatter::new(OutputFormat::Summary);
        let output = formatter.format_result(&result);
        assert!(output.contains("Vote Heads Route"));
    }

    #[test]
    fn test_csv_includes_final_url() {
        let result = CheckResult::pass(CheckCase::ImportRoute, 80)
            .with_final_url("http://localhost:5173/login");
        let formatter = ResultFormatter::new(OutputFormat::Csv).no_color();
        let output = formatter.format_result(&result);
        assert!(output.contains("http://localhost:5173/login"));
    }

    #[test]
    fn test_summary_table_handles_multibyte_base_url() {
        let base = format!("http://x{}", "あ".repeat(50));
        let summary = RoundSummary::new(
            1,
            &base,
            vec![CheckResult::pass(CheckCase::LoginRender, 90)],
        );
        let formatter = ResultFormatter::new(OutputFormat::Table).no_color();

        let output = formatter.format_summary(&summary);
        assert!(output.contains("..."));
        assert!(!output.contains(&base));
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("あいうえお", 10), "あいうえお");
        let long = "あ".repeat(30);
        assert_eq!(truncate(&long, 10), format!("{}...", "あ".repeat(7)));
    }

    #[test]
    fn test_summary_csv_header() {
        let summary = RoundSummary::new(
            1,
            "http://localhost:5173",
            vec![CheckResult::pass(CheckCase::LoginRender, 90)],
        );
        let formatter = ResultFormatter::new(OutputFormat::Csv).no_color();
        let output = formatter.format_summary(&summary);
        assert!(output.starts_with("check_num,check_name,status"));
    }
}
