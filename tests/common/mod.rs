//! Shared helpers for browser-driven integration tests.

#![allow(dead_code)]

use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;

/// Skip the test when no Chrome/Chromium binary is discoverable.
#[macro_export]
macro_rules! skip_if_no_chrome {
    () => {
        if chromiumoxide::detection::default_executable(
            chromiumoxide::detection::DetectionOptions::default(),
        )
        .is_err()
        {
            eprintln!("skipping: no Chrome/Chromium binary found");
            return;
        }
    };
}

/// Skip the test when the portal is not serving at the given URL.
#[macro_export]
macro_rules! require_local_server {
    ($url:expr) => {
        let probe = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(3))
            .build()
            .expect("client should build");
        if probe.get($url).send().await.is_err() {
            eprintln!("skipping: no server at {}", $url);
            return;
        }
    };
}

/// Portal base URL for live tests, overridable via PORTAL_SMOKE_TEST_URL.
pub fn test_base_url() -> String {
    std::env::var("PORTAL_SMOKE_TEST_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:5173".to_string())
}

/// Launch a headless browser and pump its event handler in the background.
/// Returns None (after logging) when the launch fails.
pub async fn launch_browser() -> Option<(Browser, JoinHandle<()>)> {
    let config = BrowserConfig::builder()
        .window_size(1280, 800)
        .build()
        .ok()?;

    let (browser, mut handler) = match Browser::launch(config).await {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("skipping: browser launch failed: {e}");
            return None;
        }
    };

    let handle = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    });

    Some((browser, handle))
}

/// Poll the page URL until it has been stable for two consecutive reads
/// or the deadline passes. Returns the last observed URL.
pub async fn settled_url(page: &chromiumoxide::page::Page, max_wait_ms: u64) -> String {
    let deadline = std::time::Instant::now() + std::time::Duration::from_millis(max_wait_ms);
    let mut last = String::new();
    let mut stable = 0u32;

    loop {
        let url = page.url().await.ok().flatten().unwrap_or_default();

        if !url.is_empty() && url != "about:blank" && url == last {
            stable += 1;
            if stable >= 1 {
                return url;
            }
        } else {
            stable = 0;
        }
        last = url;

        if std::time::Instant::now() >= deadline {
            return last;
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }
}
