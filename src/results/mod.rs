//! Results storage module
//!
//! Persists smoke run results as JSON under the user data directory.

#![allow(dead_code)]

mod storage;

pub use storage::{ResultsStorage, RunInfo, StoredSmokeRun};
