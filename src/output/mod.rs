//! Output module for crawl reports and statistics
//!
//! This module handles:
//! - Writing the per-page CSV report
//! - Recording and printing crawl statistics

mod csv_report;
pub mod stats;

pub use csv_report::{write_csv_report, write_csv_report_to_path, REPORT_HEADER};
pub use stats::{print_statistics, CrawlStatistics};
