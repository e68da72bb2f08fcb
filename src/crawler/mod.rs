//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The `PageFetcher` seam and its HTTP implementation
//! - HTML parsing into page records
//! - Bounded-concurrency crawl coordination

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{Coordinator, CrawlOutcome, VisitOutcome};
pub use fetcher::{build_http_client, FetchError, HttpFetcher, PageFetcher};
pub use parser::extract_page_data;

use crate::config::{CrawlOptions, UserAgentConfig};
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the options and derive the crawl base from the seed
/// 2. Build the HTTP client
/// 3. Visit the seed and every in-scope link it leads to
/// 4. Return the stored pages with run statistics
///
/// # Arguments
///
/// * `options` - Seed, concurrency limit, page budget and fetch timeout
/// * `user_agent` - Identity sent with every request
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl ran to completion
/// * `Err(CrawlError)` - Options were invalid or the client could not be built
///
/// # Example
///
/// ```no_run
/// use site_crawler::config::{CrawlOptions, UserAgentConfig};
/// use site_crawler::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let options = CrawlOptions::sequential("https://blog.boot.dev", None);
/// let outcome = crawl(options, &UserAgentConfig::default()).await?;
/// println!("{} pages", outcome.pages.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    options: CrawlOptions,
    user_agent: &UserAgentConfig,
) -> Result<CrawlOutcome, CrawlError> {
    let coordinator = Coordinator::with_http(options, user_agent)?;
    Ok(coordinator.run().await)
}
