//! Check execution engine
//!
//! Provides sequential and parallel check execution.

mod parallel;
mod runner;

pub use parallel::{AggregateResult, BatchRunner, CheckStats, ParallelExecutor};
pub use runner::CheckRunner;
