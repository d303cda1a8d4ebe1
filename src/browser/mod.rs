//! Browser session management
//!
//! Wraps chromiumoxide to drive a real Chrome instance over the
//! DevTools protocol: navigation, redirect settling, and root
//! visibility probing.

mod session;
mod settle;

pub use session::{BrowserOptions, BrowserSession};
pub use settle::UrlSettle;
