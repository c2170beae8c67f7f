//! Configuration module for Sitescribe
//!
//! This module handles loading, parsing, and validating the crawl
//! configuration. A configuration can come from a TOML file, from command
//! line flags, or from both (flags win).
//!
//! # Example
//!
//! ```no_run
//! use sitescribe::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitescribe.toml")).unwrap();
//! println!("Crawling at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, HttpConfig, OutputConfig, DEFAULT_MAX_PAGES, DEFAULT_MAX_WORKERS,
    DEFAULT_REQUEST_DELAY, DEFAULT_TIMEOUT_SECS,
};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, read_config};
pub use validation::{
    normalize_seed_url, prepare, seed_url, validate, MAX_REQUEST_DELAY, MAX_WORKERS_LIMIT,
    MIN_REQUEST_DELAY,
};
