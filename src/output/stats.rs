//! Crawl statistics and the final report
//!
//! This module provides:
//! - A live view of a running crawl's counters
//! - Snapshots of those counters
//! - The human readable summary printed when a crawl ends

use crate::crawler::{CrawlReport, Frontier};
use crate::state::ErrorList;
use crate::storage::PageStore;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Point-in-time view of a crawl's counters
#[derive(Debug, Clone)]
pub struct CrawlStats {
    /// URLs claimed for processing
    pub visited: usize,

    /// Distinct URLs ever queued, seed included
    pub discovered: usize,

    /// Recovered errors recorded so far
    pub errors: usize,

    /// Pages written to the store
    pub saved: usize,

    /// Wall-clock start of the crawl
    pub started_at: DateTime<Utc>,

    /// Time since the crawl started
    pub elapsed: Duration,
}

impl CrawlStats {
    /// Visited pages per second of elapsed time
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.visited as f64 / secs
        } else {
            0.0
        }
    }
}

/// Cloneable handle for observing a crawl while it runs
#[derive(Clone)]
pub struct StatsHandle {
    frontier: Arc<Frontier>,
    errors: Arc<ErrorList>,
    store: Arc<dyn PageStore>,
    started_at: DateTime<Utc>,
    started: Instant,
}

impl StatsHandle {
    pub fn new(frontier: Arc<Frontier>, errors: Arc<ErrorList>, store: Arc<dyn PageStore>) -> Self {
        Self {
            frontier,
            errors,
            store,
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    /// Reads the current counters
    pub fn snapshot(&self) -> CrawlStats {
        CrawlStats {
            visited: self.frontier.visited_count(),
            discovered: self.frontier.discovered_count(),
            errors: self.errors.len(),
            saved: self.store.saved_count(),
            started_at: self.started_at,
            elapsed: self.started.elapsed(),
        }
    }
}

/// Paths of the files a crawl produced
#[derive(Debug, Clone, Default)]
pub struct OutputFiles {
    pub pages: PathBuf,
    pub links: PathBuf,

    /// Present only when the error log was written
    pub errors: Option<PathBuf>,

    /// Present only when the deduplication pass ran
    pub deduplicated: Option<PathBuf>,
}

/// Size of a file in bytes, if it exists
pub fn file_size(path: &Path) -> Option<u64> {
    fs::metadata(path).ok().map(|m| m.len())
}

/// Formats a byte count in megabytes with two decimals
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

/// Formats a byte count in kilobytes with one decimal
pub fn format_kilobytes(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// Prints the end-of-crawl summary to stdout
pub fn print_report(report: &CrawlReport) {
    let stats = &report.stats;

    println!("=== Crawl Finished ===\n");

    println!("Run:");
    println!("  Started: {}", stats.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Elapsed: {:.2}s", stats.elapsed.as_secs_f64());
    println!("  Stopped: {}", report.stop_reason);
    println!();

    println!("Pages:");
    println!("  Visited: {}", stats.visited);
    println!("  Discovered: {}", stats.discovered);
    println!("  Saved: {}", stats.saved);
    println!("  Left in queue: {}", report.pending);
    println!("  Errors: {}", stats.errors);
    println!("  Rate: {:.2} pages/s", stats.pages_per_second());
    println!();

    println!("Files:");
    print_file_line(&report.files.pages, format_megabytes);
    print_file_line(&report.files.links, format_kilobytes);
    if let Some(errors) = &report.files.errors {
        print_file_line(errors, format_kilobytes);
    }
    if let Some(deduplicated) = &report.files.deduplicated {
        print_file_line(deduplicated, format_megabytes);
    }

    if let Some(dedup) = &report.dedup {
        println!();
        println!("Deduplication:");
        println!("  Sections: {}", dedup.sections);
        println!("  Lines before: {}", dedup.total_lines);
        println!("  Lines after: {}", dedup.unique_lines);
        println!("  Removed: {}", dedup.removed_lines());
        println!("  Saved: {:.1}%", dedup.saved_percent());
    }
}

fn print_file_line(path: &Path, format: fn(u64) -> String) {
    match file_size(path) {
        Some(size) => println!("  {} ({})", path.display(), format(size)),
        None => println!("  {} (missing)", path.display()),
    }
}
