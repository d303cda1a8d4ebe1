//! Portal Smoke - Dashboard Smoke Check Tool
//!
//! A CLI tool that drives a headless Chrome against the school portal
//! and verifies the dashboard routes either render their own page or
//! redirect to login.
//!
//! ## Features
//!
//! - 8 smoke checks covering routing and render health
//! - Condition-based redirect settling instead of fixed sleeps
//! - Parallel execution with one isolated browser per check
//! - Multiple output formats (Table, JSON, CSV)
//! - Persistent run history for pass-rate tracking
//!
//! ## Usage
//!
//! ```bash
//! # Run the full catalog
//! portal-smoke check --base-url http://localhost:5173
//!
//! # Run a single check
//! portal-smoke check --check 1
//!
//! # Run multiple rounds in parallel
//! portal-smoke check --rounds 10 --parallel
//!
//! # List available checks
//! portal-smoke list --detailed
//!
//! # Verify the environment first
//! portal-smoke preflight
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

mod browser;
mod checks;
mod cli;
mod config;
mod executor;
mod http;
mod models;
mod output;
mod preflight;
mod results;
mod utils;

use browser::BrowserOptions;
use checks::SettleTiming;
use cli::Args;
use executor::{BatchRunner, CheckRunner, ParallelExecutor};
use models::{CheckCase, Route, RoundSummary};
use output::{OutputFormat, ResultFormatter};
use utils::LogLevel;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    utils::init_logger(level);

    match args.command {
        cli::Command::Check(check_args) => {
            run_checks(check_args).await?;
        }
        cli::Command::List(list_args) => {
            list_checks(list_args);
        }
        cli::Command::Preflight(preflight_args) => {
            run_preflight(preflight_args).await?;
        }
        cli::Command::Results(results_args) => {
            show_results(results_args)?;
        }
        cli::Command::Config(config_args) => {
            manage_config(config_args)?;
        }
    }

    Ok(())
}

async fn run_checks(args: cli::CheckArgs) -> Result<()> {
    let timing = SettleTiming::from_millis(args.settle_ms, args.poll_ms, args.visibility_ms);

    let mut options = BrowserOptions::default()
        .with_nav_timeout(std::time::Duration::from_secs(args.timeout));
    if args.headed {
        options = options.headed();
    }
    if let Some(chrome) = &args.chrome {
        options = options.with_executable(chrome);
    }

    let skip: Vec<u8> = args
        .skip
        .as_deref()
        .map(parse_skip_list)
        .transpose()?
        .unwrap_or_default();

    let formatter =
        ResultFormatter::new(OutputFormat::from_str(&args.format).unwrap_or(OutputFormat::Table));

    info!(
        "Checking portal at {} ({} rounds)",
        args.base_url, args.rounds
    );

    let summaries = if let Some(check_num) = args.check.filter(|_| !args.all) {
        let check = CheckCase::from_number(check_num)
            .ok_or_else(|| anyhow::anyhow!("Invalid check number: {check_num} (valid: 1-8)"))?;

        let runner = CheckRunner::new(&args.base_url)
            .with_browser_options(options)
            .with_timing(timing)
            .with_skip_checks(skip);
        vec![runner.run_checks(&[check]).await?]
    } else if let Some(route_name) = args.route.as_ref().filter(|_| !args.all) {
        let route = Route::from_str(route_name)
            .ok_or_else(|| anyhow::anyhow!("Unknown route: {route_name}"))?;
        let selected = CheckCase::for_route(route);

        let runner = CheckRunner::new(&args.base_url)
            .with_browser_options(options)
            .with_timing(timing)
            .with_skip_checks(skip);
        vec![runner.run_checks(&selected).await?]
    } else if args.parallel {
        if args.rounds > 1 {
            let batch_runner = BatchRunner::new(args.concurrent, args.rounds)
                .with_browser_options(options)
                .with_timing(timing);
            let summaries = batch_runner.run_rounds(&args.base_url).await?;

            for summary in &summaries {
                println!("{}", formatter.format_summary(summary));
            }

            let aggregate = BatchRunner::aggregate_results(&summaries);
            println!("{}", formatter.format_aggregate(&aggregate, &args.base_url));

            persist_and_report(&args, summaries, &formatter, true)?;
            return Ok(());
        }

        let executor = ParallelExecutor::new(args.concurrent)
            .with_browser_options(options)
            .with_timing(timing);
        vec![executor.run_all_parallel(&args.base_url).await?]
    } else {
        let runner = CheckRunner::new(&args.base_url)
            .with_browser_options(options)
            .with_timing(timing)
            .with_skip_checks(skip);

        if args.rounds > 1 {
            runner.run_rounds(args.rounds).await?
        } else {
            vec![runner.run_all().await?]
        }
    };

    persist_and_report(&args, summaries, &formatter, false)?;
    Ok(())
}

/// Print, persist, and set the exit code from the collected rounds
fn persist_and_report(
    args: &cli::CheckArgs,
    summaries: Vec<RoundSummary>,
    formatter: &ResultFormatter,
    already_printed: bool,
) -> Result<()> {
    if !already_printed {
        for summary in &summaries {
            println!("{}", formatter.format_summary(summary));
        }
    }

    if let Some(output_path) = &args.output {
        let format = OutputFormat::from_str(&args.format).unwrap_or(OutputFormat::Table);
        if let Some(last) = summaries.last() {
            output::write_results_to_file(output_path, last, format)?;
            println!("Results saved to: {output_path}");
        }
    }

    if !args.no_save {
        let storage = results::ResultsStorage::default_dir()?;
        let mut run = results::StoredSmokeRun::new(&args.base_url);
        for summary in &summaries {
            run.add_round(summary.clone());
        }
        run.calculate_aggregate();
        storage.save(&run)?;
    }

    let all_passed = summaries.iter().all(|s| s.failed == 0 && s.errors == 0);
    if !all_passed {
        std::process::exit(1);
    }

    Ok(())
}

fn parse_skip_list(s: &str) -> Result<Vec<u8>> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<u8>()
                .map_err(|_| anyhow::anyhow!("Invalid check number in skip list: '{part}'"))
        })
        .collect()
}

fn list_checks(args: cli::ListArgs) {
    println!("\nPortal Smoke Checks (8 total)\n");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut current_category = "";

    for check in CheckCase::all() {
        let category = check.category();
        if category != current_category {
            if !current_category.is_empty() {
                println!();
            }
            println!("\n{category} Checks:");
            println!("──────────────────────────────────────────────────────────────────────");
            current_category = category;
        }

        if args.detailed {
            println!(
                "  {:2}. {:20} [{}] -> {}",
                check.number(),
                check.name(),
                check.category(),
                check.route().path()
            );
        } else {
            println!("  {:2}. {}", check.number(), check.name());
        }
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    if args.routes {
        println!("Routes Under Test:\n");
        for route in Route::all() {
            println!("  - {:22} {}", route.name(), route.path());
        }
        println!();
    }
}

async fn run_preflight(args: cli::PreflightArgs) -> Result<()> {
    let checker = preflight::PreflightChecker::new(args.timeout)?;
    let result = checker.run(&args.base_url).await;
    println!("{}", result.format_table());

    if !result.passed {
        std::process::exit(1);
    }

    Ok(())
}

fn show_results(args: cli::ResultsArgs) -> Result<()> {
    let storage = results::ResultsStorage::default_dir()?;

    let Some(base_url) = &args.base_url else {
        let hosts = storage.list_hosts()?;

        if hosts.is_empty() {
            println!("\nNo stored results found.");
            println!("   Run checks with: portal-smoke check --base-url <url>");
            return Ok(());
        }

        println!("\n┌─────────────────────────────────────────────────────────────┐");
        println!("│ Stored Smoke Results                                        │");
        println!("├─────────────────────────────────────────────────────────────┤");

        for host in &hosts {
            let runs = storage.list_runs(&format!("http://{host}"))?;
            if !runs.is_empty() {
                let latest = &runs[0];
                println!(
                    "│ {:30} │ {:3} runs │ Latest: {:5.1}% │",
                    host,
                    runs.len(),
                    latest.pass_rate * 100.0
                );
            }
        }

        println!("└─────────────────────────────────────────────────────────────┘");
        println!("\nUse --base-url <url> to view details for a specific portal.\n");

        return Ok(());
    };

    let runs = storage.load_host(base_url)?;

    if runs.is_empty() {
        println!("No results found for: {base_url}");
        return Ok(());
    }

    let latest = &runs[0];

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(latest)?);
        }
        _ => {
            println!("\n┌─────────────────────────────────────────────────────────────┐");
            println!("│ Portal: {:51} │", latest.base_url);
            println!("├─────────────────────────────────────────────────────────────┤");
            println!("│ Run ID: {:51} │", latest.id);
            println!("│ Rounds: {:<51} │", latest.rounds);

            if let Some(agg) = &latest.aggregate {
                println!("├─────────────────────────────────────────────────────────────┤");
                println!("│ Pass Rate: {:47.1}% │", agg.avg_pass_rate * 100.0);
                println!("│ Avg Duration: {:44}ms │", agg.avg_duration_ms);
                println!("├─────────────────────────────────────────────────────────────┤");
                println!("│ {:30} {:>8} {:>10} │", "Check", "Pass%", "Avg(ms)");
                println!("├─────────────────────────────────────────────────────────────┤");

                for (name, stats) in &agg.check_stats {
                    println!(
                        "│ {:30} {:>7.1}% {:>10} │",
                        name,
                        stats.pass_rate * 100.0,
                        stats.avg_duration_ms
                    );
                }
            }

            println!("└─────────────────────────────────────────────────────────────┘");

            if runs.len() > 1 {
                println!("\nOther runs ({}):", runs.len() - 1);
                for run in runs.iter().skip(1).take(5) {
                    let pass_rate = run
                        .aggregate
                        .as_ref()
                        .map(|a| format!("{:.1}%", a.avg_pass_rate * 100.0))
                        .unwrap_or_else(|| "N/A".to_string());
                    println!("  - {} | {} rounds | {}", run.id, run.rounds, pass_rate);
                }
            }
        }
    }

    Ok(())
}

fn manage_config(args: cli::ConfigArgs) -> Result<()> {
    use config::AppConfig;
    use std::path::Path;

    match args.action {
        cli::ConfigAction::Init { output, force } => {
            let path = Path::new(&output);
            if path.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {output}. Use --force to overwrite."
                );
            }

            let config = AppConfig::example();
            config.save(path)?;
            println!("Configuration file created: {output}");
            println!("\nEdit the file to customize your settings.");
        }

        cli::ConfigAction::Show { env, format } => {
            if env {
                let env_config = config::EnvConfig::load();
                env_config.print_summary();
            } else {
                let config = AppConfig::load_default()?;
                let output = if format == "json" {
                    serde_json::to_string_pretty(&config)?
                } else {
                    serde_yaml::to_string(&config)?
                };
                println!("{output}");
            }
        }

        cli::ConfigAction::Validate { file } => {
            let path = file.unwrap_or_else(|| {
                AppConfig::find()
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_else(|| "./portal-smoke.yaml".to_string())
            });

            match AppConfig::load(&path) {
                Ok(_) => {
                    println!("Configuration file is valid: {path}");
                }
                Err(e) => {
                    println!("Configuration file is invalid: {path}");
                    println!("  Error: {e}");
                    return Err(e);
                }
            }
        }

        cli::ConfigAction::Env => {
            config::env::print_env_help();
        }
    }

    Ok(())
}
