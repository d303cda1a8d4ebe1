//! Data models for smoke checking
//!
//! Defines route cases, the check catalog, and result types.

mod check_result;
mod route;

pub use check_result::{CheckCase, CheckResult, CheckStatus, RoundSummary};
pub use route::{NavigationResult, Route, RouteCase, LOGIN_SEGMENT};
