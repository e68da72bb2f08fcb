//! HTML parser for building page records
//!
//! This module handles parsing HTML content to extract:
//! - The page heading (first `<h1>`)
//! - The first paragraph, preferring one inside `<main>`
//! - Outgoing links (from `<a href>`)
//! - Image URLs (from `<img src>`)

use crate::storage::PageRecord;
use crate::url::{resolve_link, CrawlBase};
use crate::CrawlError;
use scraper::{ElementRef, Html, Selector};

/// Parses HTML content and builds the record for one page
///
/// # Extraction Rules
///
/// - **Heading**: trimmed text of the first `<h1>`; empty if none
/// - **First paragraph**: the first `<p>` inside a `<main>` element if any
///   `<main>` contains one, otherwise the first `<p>` in the document; trimmed
/// - **Outgoing links**: every `<a>` with an `href`, in document order,
///   resolved against the crawl base; duplicates are kept
/// - **Image URLs**: same rule for every `<img>` with a `src`
///
/// Heading and paragraph lookups degrade to an empty string when the
/// document cannot be queried; link and image lookups fail the whole call.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The absolute URL the page was fetched from
/// * `base` - The crawl base used to resolve relative links
///
/// # Returns
///
/// * `Ok(PageRecord)` - Successfully extracted record
/// * `Err(CrawlError::DocumentParse)` - Links or images could not be queried
///
/// # Example
///
/// ```
/// use site_crawler::crawler::extract_page_data;
/// use site_crawler::url::CrawlBase;
///
/// let base = CrawlBase::parse("https://blog.boot.dev").unwrap();
/// let html = r#"<html><body><h1>Title</h1><a href="/page">Link</a></body></html>"#;
/// let record = extract_page_data(html, "https://blog.boot.dev", &base).unwrap();
/// assert_eq!(record.heading, "Title");
/// assert_eq!(record.outgoing_links, vec!["https://blog.boot.dev/page"]);
/// ```
pub fn extract_page_data(
    html: &str,
    page_url: &str,
    base: &CrawlBase,
) -> Result<PageRecord, CrawlError> {
    let document = Html::parse_document(html);

    let outgoing_links = extract_attribute_urls(&document, "a[href]", "href", base)
        .map_err(|message| CrawlError::DocumentParse {
            url: page_url.to_string(),
            message,
        })?;

    let image_urls = extract_attribute_urls(&document, "img[src]", "src", base).map_err(
        |message| CrawlError::DocumentParse {
            url: page_url.to_string(),
            message,
        },
    )?;

    Ok(PageRecord {
        url: page_url.to_string(),
        heading: extract_heading(&document),
        first_paragraph: extract_first_paragraph(&document),
        outgoing_links,
        image_urls,
    })
}

/// Extracts the trimmed text of the first `<h1>`
fn extract_heading(document: &Html) -> String {
    let Ok(h1_selector) = Selector::parse("h1") else {
        return String::new();
    };

    document
        .select(&h1_selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

/// Extracts the first paragraph, giving `<main>` priority
fn extract_first_paragraph(document: &Html) -> String {
    let (Ok(p_selector), Ok(main_selector)) = (Selector::parse("p"), Selector::parse("main"))
    else {
        return String::new();
    };

    let in_main = document
        .select(&main_selector)
        .flat_map(|main| main.select(&p_selector))
        .next();

    in_main
        .or_else(|| document.select(&p_selector).next())
        .map(element_text)
        .unwrap_or_default()
}

/// Collects `attribute` from every element matching `selector`, resolved against the base
fn extract_attribute_urls(
    document: &Html,
    selector: &str,
    attribute: &str,
    base: &CrawlBase,
) -> Result<Vec<String>, String> {
    let selector =
        Selector::parse(selector).map_err(|e| format!("invalid selector '{}': {:?}", selector, e))?;

    Ok(document
        .select(&selector)
        .filter_map(|element| element.value().attr(attribute))
        .map(|raw| resolve_link(raw, base))
        .collect())
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
