//! Route models
//!
//! Defines the dashboard routes under test and the route-or-redirect
//! contract each one must satisfy.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// URL segment the portal redirects unauthenticated sessions to.
pub const LOGIN_SEGMENT: &str = "login";

/// Dashboard routes covered by the smoke suite
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    VoteHeads,
    Attachments,
    Import,
    DashboardHome,
    Login,
}

impl Route {
    /// Path the browser navigates to
    pub fn path(&self) -> &'static str {
        match self {
            Route::VoteHeads => "/dashboard/vote-heads",
            Route::Attachments => "/dashboard/attachments",
            Route::Import => "/dashboard/import",
            Route::DashboardHome => "/dashboard",
            Route::Login => "/login",
        }
    }

    /// URL substring that identifies the route's own page
    pub fn expected_segment(&self) -> &'static str {
        match self {
            Route::VoteHeads => "vote-heads",
            Route::Attachments => "attachments",
            Route::Import => "import",
            Route::DashboardHome => "dashboard",
            Route::Login => "login",
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Route::VoteHeads => "Vote Heads",
            Route::Attachments => "Industrial Attachments",
            Route::Import => "Data Import",
            Route::DashboardHome => "Dashboard Home",
            Route::Login => "Login",
        }
    }

    /// All routes in the suite
    pub fn all() -> Vec<Route> {
        vec![
            Route::VoteHeads,
            Route::Attachments,
            Route::Import,
            Route::DashboardHome,
            Route::Login,
        ]
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Route> {
        match s.to_lowercase().as_str() {
            "vote-heads" | "voteheads" => Some(Route::VoteHeads),
            "attachments" => Some(Route::Attachments),
            "import" => Some(Route::Import),
            "dashboard" | "home" => Some(Route::DashboardHome),
            "login" => Some(Route::Login),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single route under test: the path to navigate to and the URL
/// segments that classify the outcome as acceptable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteCase {
    /// Route path, e.g. "/dashboard/vote-heads"
    pub path: String,
    /// Substring expected in the final URL when the page renders itself
    pub expected_segment: String,
    /// Substring expected when the portal bounced us to authentication
    pub fallback_segment: String,
}

impl RouteCase {
    pub fn new(path: impl Into<String>, expected_segment: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            expected_segment: expected_segment.into(),
            fallback_segment: LOGIN_SEGMENT.to_string(),
        }
    }

    /// Build the case for a known route
    pub fn for_route(route: Route) -> Self {
        Self::new(route.path(), route.expected_segment())
    }

    /// The route-or-redirect contract: the final URL must still carry the
    /// route's own segment, or carry the login segment because the portal
    /// redirected an unauthenticated session. Anything else (blank URL,
    /// error page, unrelated redirect) violates the contract.
    pub fn is_expected_or_login_redirect(&self, final_url: &str) -> bool {
        final_url.contains(&self.expected_segment) || final_url.contains(&self.fallback_segment)
    }
}

/// Outcome of driving one navigation through the browser
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NavigationResult {
    /// URL the browser ended up at after redirects settled
    pub final_url: String,
    /// Whether the document exposed a visible root-level element
    pub root_visible: bool,
    /// Wall time of the navigation including the settle wait
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::VoteHeads.path(), "/dashboard/vote-heads");
        assert_eq!(Route::Import.expected_segment(), "import");
        assert_eq!(Route::all().len(), 5);
    }

    #[test]
    fn test_route_from_str() {
        assert_eq!(Route::from_str("vote-heads"), Some(Route::VoteHeads));
        assert_eq!(Route::from_str("IMPORT"), Some(Route::Import));
        assert_eq!(Route::from_str("unknown"), None);
    }

    #[test]
    fn test_predicate_accepts_own_page() {
        let case = RouteCase::for_route(Route::VoteHeads);
        assert!(case.is_expected_or_login_redirect("http://localhost:5173/dashboard/vote-heads"));
    }

    #[test]
    fn test_predicate_accepts_login_redirect() {
        let case = RouteCase::for_route(Route::Attachments);
        assert!(case.is_expected_or_login_redirect("http://localhost:5173/login?next=%2Fdashboard"));
    }

    #[test]
    fn test_navigation_result_feeds_predicate() {
        let nav = NavigationResult {
            final_url: "http://localhost:5173/login".to_string(),
            root_visible: true,
            duration_ms: 230,
        };
        let case = RouteCase::for_route(Route::Import);
        assert!(case.is_expected_or_login_redirect(&nav.final_url));
        assert!(nav.root_visible);
    }

    #[test]
    fn test_predicate_rejects_neither() {
        let case = RouteCase::for_route(Route::Import);
        assert!(!case.is_expected_or_login_redirect("http://localhost:5173/500"));
        assert!(!case.is_expected_or_login_redirect(""));
    }
}
