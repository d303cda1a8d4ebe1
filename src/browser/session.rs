//! Chrome session wrapper
//!
//! Owns the launched browser process and its CDP event handler task.
//! Each session is an isolated browser: concurrent checks get their own
//! session rather than sharing tabs.

#![allow(dead_code)]

use anyhow::{anyhow, Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, warn};

use super::settle::UrlSettle;
use crate::models::NavigationResult;

/// Browser launch options
#[derive(Clone, Debug)]
pub struct BrowserOptions {
    /// Run without a visible window (default)
    pub headless: bool,
    /// Explicit Chrome/Chromium binary; auto-detected when None
    pub chrome_executable: Option<PathBuf>,
    /// Viewport size
    pub window_width: u32,
    pub window_height: u32,
    /// Upper bound for a single navigation to commit
    pub nav_timeout: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_executable: None,
            window_width: 1280,
            window_height: 800,
            nav_timeout: Duration::from_secs(30),
        }
    }
}

impl BrowserOptions {
    pub fn headed(mut self) -> Self {
        self.headless = false;
        self
    }

    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }

    pub fn with_nav_timeout(mut self, timeout: Duration) -> Self {
        self.nav_timeout = timeout;
        self
    }
}

/// A live Chrome instance plus the task pumping its CDP events
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    nav_timeout: Duration,
}

impl BrowserSession {
    /// Launch Chrome and start the event handler loop
    pub async fn launch(options: &BrowserOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(options.window_width, options.window_height)
            .request_timeout(options.nav_timeout);

        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &options.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        let config = builder
            .build()
            .map_err(|e| anyhow!("Invalid browser configuration: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("Failed to launch Chrome")?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        debug!("Browser session launched");

        Ok(Self {
            browser,
            handler_task,
            nav_timeout: options.nav_timeout,
        })
    }

    /// Open a fresh blank page
    pub async fn new_page(&self) -> Result<Page> {
        self.browser
            .new_page("about:blank")
            .await
            .context("Failed to open page")
    }

    /// Navigate the page, bounded by the session's navigation timeout
    pub async fn navigate(&self, page: &Page, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        timeout(self.nav_timeout, page.goto(url))
            .await
            .map_err(|_| anyhow!("Navigation to {url} timed out"))?
            .with_context(|| format!("Navigation to {url} failed"))?;
        Ok(())
    }

    /// Current page URL as the browser reports it
    pub async fn current_url(&self, page: &Page) -> Result<String> {
        let url = page.url().await.context("Failed to read page URL")?;
        Ok(url.unwrap_or_default())
    }

    /// Poll the page URL until it stops moving or `max_wait` elapses.
    /// Returns the settled URL, or the last observed one on bound expiry.
    pub async fn wait_for_url_settled(
        &self,
        page: &Page,
        max_wait: Duration,
        poll_interval: Duration,
    ) -> Result<String> {
        let mut settle = UrlSettle::new(2);
        let deadline = Instant::now() + max_wait;

        loop {
            let url = self.current_url(page).await?;
            if settle.observe(&url) {
                debug!("URL settled at {}", url);
                return Ok(url);
            }

            if Instant::now() >= deadline {
                let last = settle.last_url().unwrap_or(&url).to_string();
                warn!("URL did not settle within {:?}; using {}", max_wait, last);
                return Ok(last);
            }

            sleep(poll_interval).await;
        }
    }

    /// Navigate, wait for the location to stop moving, and probe the
    /// root element once. The bundled outcome feeds both routing and
    /// render checks.
    pub async fn navigate_settled(
        &self,
        page: &Page,
        url: &str,
        max_wait: Duration,
        poll_interval: Duration,
    ) -> Result<NavigationResult> {
        let start = Instant::now();

        self.navigate(page, url).await?;
        let final_url = self
            .wait_for_url_settled(page, max_wait, poll_interval)
            .await?;
        let root_visible = self.root_visible(page).await?;

        Ok(NavigationResult {
            final_url,
            root_visible,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Check the document exposes a visible root-level element.
    ///
    /// A rendered page has either the SPA mount point (#root) or at
    /// least a body with a nonzero box; a blank/broken render has
    /// neither.
    pub async fn root_visible(&self, page: &Page) -> Result<bool> {
        let probe: serde_json::Value = page
            .evaluate(
                r#"(() => {
                    const root = document.querySelector('#root') || document.body;
                    if (!root) {
                        return { rootVisible: false };
                    }
                    const rect = root.getBoundingClientRect();
                    const style = getComputedStyle(root);
                    return {
                        rootVisible: rect.width > 0 && rect.height > 0 &&
                            style.display !== 'none' &&
                            style.visibility !== 'hidden',
                        width: rect.width,
                        height: rect.height
                    };
                })()"#,
            )
            .await
            .context("Failed to evaluate visibility probe")?
            .into_value()
            .context("Visibility probe returned no value")?;

        debug!("Visibility probe: {}", probe);

        Ok(probe["rootVisible"].as_bool().unwrap_or(false))
    }

    /// Shut down the browser and stop the event loop
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Browser close failed: {}", e);
        }
        let _ = self.browser.wait().await;
        self.handler_task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = BrowserOptions::default();
        assert!(options.headless);
        assert!(options.chrome_executable.is_none());
        assert_eq!(options.nav_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_options_builder() {
        let options = BrowserOptions::default()
            .headed()
            .with_executable("/usr/bin/chromium")
            .with_nav_timeout(Duration::from_secs(10));

        assert!(!options.headless);
        assert_eq!(
            options.chrome_executable,
            Some(PathBuf::from("/usr/bin/chromium"))
        );
        assert_eq!(options.nav_timeout, Duration::from_secs(10));
    }
}
