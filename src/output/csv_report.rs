//! CSV report of crawled pages

use crate::storage::PageRecord;
use crate::CrawlError;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column names of the report, in order
pub const REPORT_HEADER: [&str; 5] = [
    "page_url",
    "heading",
    "first_paragraph",
    "outgoing_link_urls",
    "image_urls",
];

const LIST_SEPARATOR: &str = ";";

/// Writes one CSV row per completed page
///
/// Rows follow the map's key order, so a snapshot produces a report sorted by
/// normalized URL. Link and image lists are joined with `;`.
///
/// # Arguments
///
/// * `pages` - Completed pages keyed by normalized URL
/// * `writer` - Destination for the CSV text
///
/// # Returns
///
/// * `Ok(())` - Report written and flushed
/// * `Err(CrawlError)` - Serialization or IO failure
pub fn write_csv_report<W: Write>(
    pages: &BTreeMap<String, PageRecord>,
    writer: W,
) -> Result<(), CrawlError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(REPORT_HEADER)?;

    for record in pages.values() {
        csv_writer.write_record([
            record.url.as_str(),
            record.heading.as_str(),
            record.first_paragraph.as_str(),
            &record.outgoing_links.join(LIST_SEPARATOR),
            &record.image_urls.join(LIST_SEPARATOR),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Creates (or truncates) `path` and writes the report into it
pub fn write_csv_report_to_path(
    pages: &BTreeMap<String, PageRecord>,
    path: &Path,
) -> Result<(), CrawlError> {
    let file = File::create(path)?;
    write_csv_report(pages, file)?;
    tracing::info!("Wrote {} pages to {}", pages.len(), path.display());
    Ok(())
}
