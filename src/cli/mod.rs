//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

/// School portal dashboard smoke checker
#[derive(Parser, Debug)]
#[command(name = "portal-smoke")]
#[command(version = "0.1.0")]
#[command(about = "Browser-driven smoke checks for the school portal dashboard")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run smoke checks against the portal
    Check(CheckArgs),

    /// List available checks and routes
    List(ListArgs),

    /// Verify the environment before running checks
    Preflight(PreflightArgs),

    /// View stored smoke results
    Results(ResultsArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Portal base URL
    #[arg(short, long, default_value = "http://localhost:5173")]
    pub base_url: String,

    /// Specific check number to run (1-8)
    #[arg(short, long)]
    pub check: Option<u8>,

    /// Run the full catalog, overriding any check/route filter
    #[arg(short, long)]
    pub all: bool,

    /// Only run checks for one route (vote-heads, attachments, import, dashboard, login)
    #[arg(long)]
    pub route: Option<String>,

    /// Number of smoke rounds
    #[arg(short, long, default_value = "1")]
    pub rounds: u32,

    /// Run checks in parallel, each in its own browser
    #[arg(short, long)]
    pub parallel: bool,

    /// Maximum concurrent browser sessions (when parallel)
    #[arg(long, default_value = "4")]
    pub concurrent: usize,

    /// Output format (table, json, json-pretty, csv, summary)
    #[arg(short, long, default_value = "table")]
    pub format: String,

    /// Navigation timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Upper bound for the URL settle wait, milliseconds
    #[arg(long, default_value = "5000")]
    pub settle_ms: u64,

    /// Interval between URL/visibility polls, milliseconds
    #[arg(long, default_value = "100")]
    pub poll_ms: u64,

    /// Upper bound for the root element to become visible, milliseconds
    #[arg(long, default_value = "10000")]
    pub visibility_ms: u64,

    /// Skip specific checks (comma-separated check numbers)
    #[arg(long)]
    pub skip: Option<String>,

    /// Run Chrome with a visible window
    #[arg(long)]
    pub headed: bool,

    /// Explicit Chrome/Chromium binary path
    #[arg(long)]
    pub chrome: Option<String>,

    /// Save formatted results to file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Do not persist results to the run store
    #[arg(long)]
    pub no_save: bool,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show detailed check information
    #[arg(short, long)]
    pub detailed: bool,

    /// Show routes under test
    #[arg(short = 'u', long)]
    pub routes: bool,
}

/// Arguments for preflight command
#[derive(Parser, Debug)]
pub struct PreflightArgs {
    /// Portal base URL
    #[arg(short, long, default_value = "http://localhost:5173")]
    pub base_url: String,

    /// Probe timeout in seconds
    #[arg(long, default_value = "10")]
    pub timeout: u64,
}

/// Arguments for results command
#[derive(Parser, Debug)]
pub struct ResultsArgs {
    /// Filter by portal base URL
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write an example configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "./portal-smoke.yaml")]
        output: String,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Show {
        /// Show environment variable overrides instead
        #[arg(short, long)]
        env: bool,

        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },

    /// Validate a configuration file
    Validate {
        /// Path to config file (defaults to the first standard location)
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Print supported environment variables
    Env,
}
