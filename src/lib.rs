//! Site-Crawler: a bounded-concurrency single-host crawler
//!
//! This crate crawls a website starting from a seed URL, stays within the seed's
//! host, extracts a heading, first paragraph, outgoing links and image URLs from
//! every page, and follows in-scope links until a page budget is exhausted.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Malformed URL '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },

    #[error("Fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        source: crawler::FetchError,
    },

    #[error("HTML parse error for {url}: {message}")]
    DocumentParse { url: String, message: String },

    #[error("Admission gate closed before {url} could be fetched")]
    GateClosed { url: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Report error: {0}")]
    Report(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CrawlError {
    /// Short label for the failure kind, used in statistics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::MalformedUrl { .. } => "malformed_url",
            Self::Fetch {
                source: crawler::FetchError::Timeout(_),
                ..
            } => "timeout",
            Self::Fetch { .. } => "fetch",
            Self::DocumentParse { .. } => "document_parse",
            Self::GateClosed { .. } => "gate_closed",
            Self::HttpClient(_) => "http_client",
            Self::Report(_) => "report",
            Self::Io(_) => "io",
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, CrawlOptions};
pub use crawler::{crawl, Coordinator, CrawlOutcome, HttpFetcher, PageFetcher};
pub use state::VisitState;
pub use storage::{PageRecord, ResultStore};
pub use url::{normalize_url, resolve_link, CrawlBase};
