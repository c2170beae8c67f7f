//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The shared frontier and visited set
//! - HTTP fetching behind the `PageFetcher` trait
//! - HTML to text extraction behind the `TextExtractor` trait
//! - The per-page worker procedure
//! - Overall crawl coordination and cancellation

mod cancel;
mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod worker;

pub use cancel::CancelFlag;
pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use extractor::{clean_text, ExtractedPage, ScraperExtractor, TextExtractor, BULLET};
pub use fetcher::{
    build_http_client, fetch_url, is_html_content_type, FetchResult, HttpFetcher, PageFetcher,
};
pub use frontier::Frontier;
