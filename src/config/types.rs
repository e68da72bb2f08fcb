use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure, loaded from an optional TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of simultaneous fetch + extract sequences
    #[serde(rename = "max-concurrency")]
    pub max_concurrency: usize,

    /// Maximum number of pages claimed over the whole crawl
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Per-fetch timeout in milliseconds; 0 disables it
    #[serde(rename = "fetch-timeout-ms")]
    pub fetch_timeout_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 5,
            max_pages: 100,
            fetch_timeout_ms: 30_000,
        }
    }
}

impl CrawlerConfig {
    /// The fetch timeout, or `None` when disabled
    pub fn fetch_timeout(&self) -> Option<Duration> {
        (self.fetch_timeout_ms > 0).then(|| Duration::from_millis(self.fetch_timeout_ms))
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "BootCrawler".to_string(),
            crawler_version: "1.0".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version`
    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the CSV report written after a bounded crawl
    #[serde(rename = "report-path")]
    pub report_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: "report.csv".to_string(),
        }
    }
}

/// Explicit settings for one crawl, handed to the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOptions {
    /// The seed URL; also the crawl base for scope and resolution
    pub seed: String,

    /// Admission gate capacity
    pub max_concurrency: usize,

    /// Page budget
    pub max_pages: usize,

    /// Per-fetch timeout; `None` waits forever
    pub fetch_timeout: Option<Duration>,
}

impl CrawlOptions {
    /// Bounded crawl settings taken from the configuration
    pub fn from_config(seed: impl Into<String>, crawler: &CrawlerConfig) -> Self {
        Self {
            seed: seed.into(),
            max_concurrency: crawler.max_concurrency,
            max_pages: crawler.max_pages,
            fetch_timeout: crawler.fetch_timeout(),
        }
    }

    /// One page at a time with no page budget
    pub fn sequential(seed: impl Into<String>, fetch_timeout: Option<Duration>) -> Self {
        Self {
            seed: seed.into(),
            max_concurrency: 1,
            max_pages: usize::MAX,
            fetch_timeout,
        }
    }
}
