//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - The `PageFetcher` seam the orchestrator fetches through
//! - Building HTTP clients with the crawler's user agent string
//! - GET requests to fetch page content
//! - Error classification

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Reasons a page fetch can fail
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a 4xx or 5xx status
    #[error("HTTP {status_code}")]
    HttpStatus { status_code: u16 },

    /// Connection, DNS, TLS or other transport failure
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be read as text
    #[error("failed to read body: {0}")]
    Body(String),

    /// No response within the configured fetch timeout
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Capability to fetch the HTML body of a page
///
/// The orchestrator only ever fetches through this trait, so tests and
/// alternative transports can stand in for `HttpFetcher`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` and returns the body text
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Optional whole-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use site_crawler::config::UserAgentConfig;
/// use site_crawler::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "BootCrawler".to_string(),
///     crawler_version: "1.0".to_string(),
/// };
///
/// let client = build_http_client(&config, None).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Option<Duration>,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build()
}

/// `PageFetcher` backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Option<Duration>,
}

impl HttpFetcher {
    /// Builds a fetcher with its own client
    pub fn new(config: &UserAgentConfig, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config, timeout)?,
            timeout,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    /// Fetches a URL with a single GET request
    ///
    /// # Error Mapping
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | HTTP 4xx / 5xx | `HttpStatus` |
    /// | Request timeout | `Timeout` |
    /// | Connection refused, DNS, TLS | `Network` |
    /// | Unreadable body | `Body` |
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify_request_error(e))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::HttpStatus {
                status_code: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))
    }
}

impl HttpFetcher {
    fn classify_request_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout.unwrap_or_default())
        } else if e.is_connect() {
            FetchError::Network(format!("connection failed: {}", e))
        } else {
            FetchError::Network(e.to_string())
        }
    }
}
