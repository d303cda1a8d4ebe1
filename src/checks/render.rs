//! Page render checks
//!
//! Verifies the document served for a route exposes a visible
//! root-level element, the minimal signal that the page did not come
//! up blank or broken.

#![allow(dead_code)]

use anyhow::Result;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::browser::BrowserSession;
use crate::models::{CheckCase, CheckResult, RouteCase};
use crate::utils::Timer;

use super::SettleTiming;

/// Checks that a route's document renders a visible root element.
///
/// Navigation is independent of the routing check for the same route:
/// each check drives its own page load.
#[derive(Clone, Debug)]
pub struct PageRenderCheck {
    pub base_url: String,
    pub route: RouteCase,
    pub check: CheckCase,
    timing: SettleTiming,
}

impl PageRenderCheck {
    pub fn new(base_url: impl Into<String>, route: RouteCase, check: CheckCase) -> Self {
        Self {
            base_url: base_url.into(),
            route,
            check,
            timing: SettleTiming::default(),
        }
    }

    pub fn with_timing(mut self, timing: SettleTiming) -> Self {
        self.timing = timing;
        self
    }

    fn target_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.route.path)
    }

    pub async fn run(&self, session: &BrowserSession) -> Result<CheckResult> {
        info!("Running {}", self.check);
        let timer = Timer::start(self.check.name());

        let page = session.new_page().await?;
        let url = self.target_url();
        debug!("Checking render of {}", url);

        // Let any redirect land first so we probe the page the user
        // would actually see.
        let nav = session
            .navigate_settled(&page, &url, self.timing.settle_wait, self.timing.poll_interval)
            .await?;

        // The SPA may mount slightly after the URL stops moving; keep
        // polling visibility up to its own bound.
        let deadline = Instant::now() + self.timing.visibility_timeout;
        let mut visible = nav.root_visible;
        while !visible {
            if Instant::now() >= deadline {
                break;
            }
            sleep(self.timing.poll_interval).await;
            visible = session.root_visible(&page).await?;
        }

        let duration_ms = timer.elapsed_ms();
        page.close().await.ok();

        if visible {
            Ok(CheckResult::pass(self.check, duration_ms)
                .with_final_url(&nav.final_url)
                .with_message(format!("{} rendered a visible root", self.route.path)))
        } else {
            Ok(CheckResult::fail(
                self.check,
                duration_ms,
                format!(
                    "no visible root element at '{}' within {:?}",
                    nav.final_url, self.timing.visibility_timeout
                ),
            )
            .with_final_url(nav.final_url))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Route;

    #[test]
    fn test_render_check_builder() {
        let check = PageRenderCheck::new(
            "http://localhost:5173",
            RouteCase::for_route(Route::Login),
            CheckCase::LoginRender,
        )
        .with_timing(SettleTiming::from_millis(1000, 50, 2000));

        assert_eq!(check.target_url(), "http://localhost:5173/login");
        assert_eq!(check.check, CheckCase::LoginRender);
    }
}
