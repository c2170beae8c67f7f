//! Output module for crawl results and post-processing
//!
//! This module handles:
//! - Live and final crawl statistics, and the printed report
//! - Writing the sorted error log
//! - Removing repeated lines from the page store, section by section

mod dedup;
mod error_log;
pub mod stats;

pub use dedup::{dedupe, dedupe_file, dedupe_sections, DedupStats, SECTION_SEPARATOR};
pub use error_log::write_error_log;
pub use stats::{print_report, CrawlStats, OutputFiles, StatsHandle};
