//! URL handling module
//!
//! This module provides the three URL rules the crawl's correctness rests on:
//! - Normalization into a deduplication key
//! - The in-scope test against the crawl base
//! - Resolution of raw `href`/`src` values into absolute URLs

mod normalize;
mod resolve;
mod scope;

// Re-export main functions
pub use normalize::normalize_url;
pub use resolve::resolve_link;
pub use scope::CrawlBase;
