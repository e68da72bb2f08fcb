//! Storage module for crawl results
//!
//! This module holds the in-memory result store shared by every crawl task:
//! - The record produced for each crawled page
//! - The atomic claim that guarantees at-most-once work per normalized URL
//! - The page budget, enforced inside the same critical section as the claim

mod store;

pub use store::{ClaimOutcome, ResultStore};

/// Represents one crawled page
///
/// Created once extraction completes; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageRecord {
    /// The absolute URL the page was fetched from
    pub url: String,

    /// Text of the first `<h1>`, trimmed; empty if none
    pub heading: String,

    /// Text of the first paragraph, preferring `<main>`; empty if none
    pub first_paragraph: String,

    /// Absolute outgoing link URLs in document order, duplicates kept
    pub outgoing_links: Vec<String>,

    /// Absolute image URLs in document order, duplicates kept
    pub image_urls: Vec<String>,
}
