//! Live smoke tests against a running portal instance.
//!
//! Requires the portal dev server (default http://127.0.0.1:5173,
//! override with PORTAL_SMOKE_TEST_URL) and a local Chrome/Chromium.
//! Tests skip themselves when either is missing.
//!
//! Run with: cargo test --test live_smoke

#[path = "common/mod.rs"]
mod common;

use common::{launch_browser, settled_url, test_base_url};

const DASHBOARD_ROUTES: &[(&str, &str)] = &[
    ("/dashboard/vote-heads", "vote-heads"),
    ("/dashboard/attachments", "attachments"),
    ("/dashboard/import", "import"),
];

#[tokio::test]
async fn dashboard_routes_render_or_redirect_to_login() {
    skip_if_no_chrome!();
    let base_url = test_base_url();
    require_local_server!(&base_url);

    let Some((mut browser, handle)) = launch_browser().await else {
        return;
    };

    for (path, segment) in DASHBOARD_ROUTES {
        let page = browser
            .new_page("about:blank")
            .await
            .expect("should create page");

        let url = format!("{}{}", base_url.trim_end_matches('/'), path);
        page.goto(&url).await.expect("should navigate");

        let final_url = settled_url(&page, 5000).await;

        assert!(
            final_url.contains(segment) || final_url.contains("login"),
            "{path}: final URL '{final_url}' contains neither '{segment}' nor 'login'"
        );

        page.close().await.ok();
    }

    browser.close().await.ok();
    browser.wait().await.ok();
    handle.abort();
}

#[tokio::test]
async fn unauthenticated_dashboard_home_is_guarded() {
    skip_if_no_chrome!();
    let base_url = test_base_url();
    require_local_server!(&base_url);

    let Some((mut browser, handle)) = launch_browser().await else {
        return;
    };

    let page = browser
        .new_page("about:blank")
        .await
        .expect("should create page");

    let url = format!("{}/dashboard", base_url.trim_end_matches('/'));
    page.goto(&url).await.expect("should navigate");

    let final_url = settled_url(&page, 5000).await;

    // Either an authenticated session stayed on the dashboard or the
    // guard bounced us to login; anything else is broken routing.
    assert!(
        final_url.contains("dashboard") || final_url.contains("login"),
        "dashboard guard: unexpected final URL '{final_url}'"
    );

    page.close().await.ok();
    browser.close().await.ok();
    browser.wait().await.ok();
    handle.abort();
}

#[tokio::test]
async fn login_page_renders_visible_root() {
    skip_if_no_chrome!();
    let base_url = test_base_url();
    require_local_server!(&base_url);

    let Some((mut browser, handle)) = launch_browser().await else {
        return;
    };

    let page = browser
        .new_page("about:blank")
        .await
        .expect("should create page");

    let url = format!("{}/login", base_url.trim_end_matches('/'));
    page.goto(&url).await.expect("should navigate");

    settled_url(&page, 5000).await;

    // The SPA may mount shortly after the URL settles.
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
    let mut visible = false;
    while std::time::Instant::now() < deadline {
        let probe: serde_json::Value = page
            .evaluate(
                r#"(() => {
                    const root = document.querySelector('#root') || document.body;
                    if (!root) { return { rootVisible: false }; }
                    const rect = root.getBoundingClientRect();
                    const style = getComputedStyle(root);
                    return {
                        rootVisible: rect.width > 0 && rect.height > 0 &&
                            style.display !== 'none' &&
                            style.visibility !== 'hidden'
                    };
                })()"#,
            )
            .await
            .expect("should evaluate probe")
            .into_value()
            .expect("should get value");

        if probe["rootVisible"].as_bool().unwrap_or(false) {
            visible = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }

    assert!(visible, "login page has no visible root element");

    page.close().await.ok();
    browser.close().await.ok();
    browser.wait().await.ok();
    handle.abort();
}
