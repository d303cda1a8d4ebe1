//! URL settle detection
//!
//! The portal is a client-side routed app: after the initial load it may
//! rewrite the location (e.g. bounce an unauthenticated session to
//! /login). Instead of sleeping a fixed duration and hoping the redirect
//! finished, the session polls the page URL and treats it as settled once
//! it has been stable across consecutive reads.

/// Tracks consecutive URL observations and decides when the location
/// has stopped moving. Pure state machine so the decision is testable
/// without a browser.
#[derive(Debug)]
pub struct UrlSettle {
    required_stable_reads: u32,
    last: Option<String>,
    stable: u32,
}

impl UrlSettle {
    /// `required_stable_reads` is the number of identical consecutive
    /// observations needed before the URL counts as settled (>= 2).
    pub fn new(required_stable_reads: u32) -> Self {
        Self {
            required_stable_reads: required_stable_reads.max(2),
            last: None,
            stable: 0,
        }
    }

    /// Feed one observation. Returns true once the URL is settled.
    ///
    /// "about:blank" never settles: it is the pristine page before the
    /// first navigation commits.
    pub fn observe(&mut self, url: &str) -> bool {
        if url.is_empty() || url == "about:blank" {
            self.last = None;
            self.stable = 0;
            return false;
        }

        match &self.last {
            Some(prev) if prev == url => {
                self.stable += 1;
            }
            _ => {
                self.last = Some(url.to_string());
                self.stable = 1;
            }
        }

        self.stable >= self.required_stable_reads
    }

    /// Last URL observed, settled or not. On bound expiry the caller
    /// reports this as the final URL.
    pub fn last_url(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settles_after_stable_reads() {
        let mut settle = UrlSettle::new(2);
        assert!(!settle.observe("http://localhost/dashboard/import"));
        assert!(settle.observe("http://localhost/dashboard/import"));
    }

    #[test]
    fn test_redirect_resets_counter() {
        let mut settle = UrlSettle::new(2);
        assert!(!settle.observe("http://localhost/dashboard/import"));
        // Client-side redirect lands on /login; counting starts over.
        assert!(!settle.observe("http://localhost/login"));
        assert!(settle.observe("http://localhost/login"));
        assert_eq!(settle.last_url(), Some("http://localhost/login"));
    }

    #[test]
    fn test_about_blank_never_settles() {
        let mut settle = UrlSettle::new(2);
        assert!(!settle.observe("about:blank"));
        assert!(!settle.observe("about:blank"));
        assert!(!settle.observe("about:blank"));
        assert_eq!(settle.last_url(), None);
    }

    #[test]
    fn test_minimum_two_reads() {
        // A single read can never prove stability.
        let mut settle = UrlSettle::new(0);
        assert!(!settle.observe("http://localhost/login"));
        assert!(settle.observe("http://localhost/login"));
    }

    #[test]
    fn test_flapping_url_never_settles() {
        let mut settle = UrlSettle::new(2);
        for _ in 0..10 {
            assert!(!settle.observe("http://localhost/a"));
            assert!(!settle.observe("http://localhost/b"));
        }
        // Bound expiry path: caller falls back to the last observation.
        assert_eq!(settle.last_url(), Some("http://localhost/b"));
    }
}
