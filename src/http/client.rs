//! HTTP client for server-side probes
//!
//! Used to confirm the portal answers at all before a browser is ever
//! launched against it.

#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// HTTP probe errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Thin reqwest wrapper that classifies failures and reports where a
/// request ended up after server-side redirects.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout_secs: u64,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(30)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .danger_accept_invalid_certs(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }

    /// GET the URL, following redirects, and report the outcome
    pub async fn get(&self, url: &str) -> Result<HttpResponse> {
        debug!("Probing {}", url);

        let start = std::time::Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                anyhow::anyhow!(HttpError::Timeout(self.timeout_secs))
            } else if e.is_connect() {
                anyhow::anyhow!(HttpError::ConnectionRefused(url.to_string()))
            } else if e.is_builder() {
                anyhow::anyhow!(HttpError::InvalidUrl(url.to_string()))
            } else {
                anyhow::anyhow!(HttpError::RequestFailed(e.to_string()))
            }
        })?;

        let duration_ms = start.elapsed().as_millis() as u64;
        let status = response.status();
        let final_url = response.url().to_string();

        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        debug!(
            "Response: {} {} in {}ms (final URL {})",
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            duration_ms,
            final_url
        );

        Ok(HttpResponse {
            status_code: status.as_u16(),
            final_url,
            body,
            duration_ms,
        })
    }
}

/// HTTP probe response
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status_code: u16,
    /// URL after server-side redirects
    pub final_url: String,
    pub body: String,
    pub duration_ms: u64,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code)
    }

    pub fn body_contains(&self, text: &str) -> bool {
        self.body.contains(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_classification() {
        let resp = HttpResponse {
            status_code: 200,
            final_url: "http://localhost:5173/login".to_string(),
            body: "<div id=\"root\"></div>".to_string(),
            duration_ms: 12,
        };

        assert!(resp.is_success());
        assert!(!resp.is_server_error());
        assert!(resp.body_contains("root"));
    }

    #[test]
    fn test_error_display() {
        let err = HttpError::ConnectionRefused("http://localhost:5173".to_string());
        assert!(err.to_string().contains("Connection refused"));
    }
}
