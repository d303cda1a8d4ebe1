//! Output formatting module
//!
//! Provides various output formats for smoke check results.

mod formatter;

pub use formatter::{write_results_to_file, OutputFormat, ResultFormatter};
