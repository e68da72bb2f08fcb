//! Configuration module
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, and turning it into explicit per-crawl options.
//!
//! # Example
//!
//! ```no_run
//! use site_crawler::config::{load_config, CrawlOptions};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! let options = CrawlOptions::from_config("https://example.com", &config.crawler);
//! println!("Crawler will fetch at most {} pages", options.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlOptions, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::{validate, validate_options};
