use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default page budget for a crawl
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// Default size of the worker pool
pub const DEFAULT_MAX_WORKERS: u32 = 10;

/// Default (and minimum) delay before every fetch, in seconds
pub const DEFAULT_REQUEST_DELAY: f64 = 0.3;

/// Default per-request network timeout, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Main configuration structure for Sitescribe
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Builds a configuration with defaults everywhere except the seed URL
    pub fn for_seed(seed_url: impl Into<String>) -> Self {
        Self {
            crawler: CrawlerConfig {
                seed_url: seed_url.into(),
                ..CrawlerConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the fixed delay that precedes every fetch
    pub fn request_delay(&self) -> Duration {
        Duration::from_secs_f64(self.crawler.request_delay)
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Page the crawl starts from; its host defines the crawl scope
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Maximum number of pages claimed for processing
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Number of pages processed concurrently
    #[serde(rename = "max-workers")]
    pub max_workers: u32,

    /// Delay before every fetch, per worker (seconds)
    #[serde(rename = "request-delay")]
    pub request_delay: f64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: String::new(),
            max_pages: DEFAULT_MAX_PAGES,
            max_workers: DEFAULT_MAX_WORKERS,
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Output file configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory all output files are written to
    pub directory: PathBuf,

    /// Append-only store of extracted page text
    #[serde(rename = "pages-file")]
    pub pages_file: String,

    /// One URL per successfully saved page
    #[serde(rename = "links-file")]
    pub links_file: String,

    /// Sorted error log, written only when errors occurred
    #[serde(rename = "errors-file")]
    pub errors_file: String,

    /// Page store with repeated lines removed per section
    #[serde(rename = "deduplicated-file")]
    pub deduplicated_file: String,

    /// Run the deduplication pass after a crawl that was not cancelled
    pub deduplicate: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            pages_file: "pages.txt".to_string(),
            links_file: "visited_links.txt".to_string(),
            errors_file: "errors.txt".to_string(),
            deduplicated_file: "pages_unique.txt".to_string(),
            deduplicate: true,
        }
    }
}

impl OutputConfig {
    pub fn pages_path(&self) -> PathBuf {
        self.directory.join(&self.pages_file)
    }

    pub fn links_path(&self) -> PathBuf {
        self.directory.join(&self.links_file)
    }

    pub fn errors_path(&self) -> PathBuf {
        self.directory.join(&self.errors_file)
    }

    pub fn deduplicated_path(&self) -> PathBuf {
        self.directory.join(&self.deduplicated_file)
    }
}
