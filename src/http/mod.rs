//! HTTP client module
//!
//! Plain HTTP probes used by preflight; the checks themselves go
//! through the browser.

mod client;

pub use client::{HttpClient, HttpError, HttpResponse};
