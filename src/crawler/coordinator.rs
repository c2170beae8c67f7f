//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the control loop that drives a crawl:
//! - Dispatching claimed URLs to a bounded pool of worker tasks
//! - Feeding links returned by finished workers back into the frontier
//! - Detecting page-limit, exhaustion and cancellation stops
//! - Draining in-flight work and writing the error log
//! - Running the deduplication pass over the page store

use crate::config::{seed_url, validate, Config};
use crate::crawler::cancel::CancelFlag;
use crate::crawler::extractor::{ScraperExtractor, TextExtractor};
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::worker::{process_page, WorkerContext};
use crate::output::{dedupe_file, write_error_log, CrawlStats, DedupStats, OutputFiles, StatsHandle};
use crate::state::{ErrorList, ErrorRecord, RunState, StopReason};
use crate::storage::{open_store, PageStore};
use crate::url::{canonicalize, DomainScope, LinkNormalizer};
use crate::CrawlError;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};
use url::Url;

/// Pause between control loop iterations while workers are busy
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Completed-page interval between progress log lines
const PROGRESS_INTERVAL: usize = 10;

/// What a supervised worker hands back: its URL and the worker's outcome
type WorkerOutcome = (Url, Result<Vec<Url>, JoinError>);

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Why dispatching stopped
    pub stop_reason: StopReason,

    /// Final counters, taken after every worker finished
    pub stats: CrawlStats,

    /// URLs left in the frontier
    pub pending: usize,

    /// Every recovered error, in recording order
    pub errors: Vec<ErrorRecord>,

    pub files: OutputFiles,

    /// Present when the deduplication pass ran
    pub dedup: Option<DedupStats>,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    seed: Url,
    scope: DomainScope,
    frontier: Arc<Frontier>,
    errors: Arc<ErrorList>,
    store: Arc<dyn PageStore>,
    worker: Arc<WorkerContext>,
    cancel: CancelFlag,
    stats: StatsHandle,
    state: RunState,
}

impl Coordinator {
    /// Creates a coordinator that fetches over HTTP and writes text files
    ///
    /// # Arguments
    ///
    /// * `config` - A validated crawl configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlError)` - The seed is unusable, the HTTP client could not
    ///   be built or the page store could not be opened
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        seed_url(&config)?;

        let fetcher = Arc::new(HttpFetcher::new(&config.http)?);
        let store = Arc::new(open_store(
            &config.output.pages_path(),
            &config.output.links_path(),
        )?);

        Self::with_components(config, fetcher, Arc::new(ScraperExtractor), store)
    }

    /// Creates a coordinator from explicit collaborators
    ///
    /// The configuration is validated again here, so every crawl honors the
    /// worker and delay bounds regardless of how it was built.
    pub fn with_components(
        config: Config,
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn TextExtractor>,
        store: Arc<dyn PageStore>,
    ) -> Result<Self, CrawlError> {
        validate(&config)?;

        let seed = canonicalize(seed_url(&config)?);
        let scope = DomainScope::from_seed(&seed)?;

        let frontier = Arc::new(Frontier::new(seed.clone()));
        let errors = Arc::new(ErrorList::new());
        let cancel = CancelFlag::new();

        let worker = Arc::new(WorkerContext {
            fetcher,
            extractor,
            store: Arc::clone(&store),
            normalizer: LinkNormalizer::new(scope.clone()),
            errors: Arc::clone(&errors),
            cancel: cancel.clone(),
            request_delay: config.request_delay(),
        });

        let stats = StatsHandle::new(Arc::clone(&frontier), Arc::clone(&errors), Arc::clone(&store));

        Ok(Self {
            config: Arc::new(config),
            seed,
            scope,
            frontier,
            errors,
            store,
            worker,
            cancel,
            stats,
            state: RunState::Running,
        })
    }

    /// Returns a handle that cancels this crawl when raised
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Returns a handle for observing counters while the crawl runs
    pub fn stats(&self) -> StatsHandle {
        self.stats.clone()
    }

    pub fn scope(&self) -> &DomainScope {
        &self.scope
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    /// Runs the crawl to completion
    ///
    /// The loop:
    /// 1. Stops on cancellation or once `max_pages` URLs were claimed
    /// 2. Fills free worker slots from the frontier, claiming each URL
    /// 3. Stops when nothing is queued and nothing is in flight
    /// 4. Otherwise waits for a worker to finish or for the poll interval
    ///
    /// Whatever the stop reason, in-flight workers are awaited and their
    /// links recorded before the error log and report are produced.
    pub async fn run(mut self) -> Result<CrawlReport, CrawlError> {
        let max_pages = self.config.crawler.max_pages as usize;
        let max_workers = self.config.crawler.max_workers as usize;

        tracing::info!(
            "Starting crawl at {} (domains: {}, workers: {}, limit: {}, delay: {:.2}s)",
            self.seed,
            self.scope.hosts().join(", "),
            max_workers,
            max_pages,
            self.config.crawler.request_delay
        );

        let mut tasks: JoinSet<WorkerOutcome> = JoinSet::new();
        let mut completed = 0;

        let reason = loop {
            if self.cancel.is_cancelled() {
                break StopReason::Cancelled;
            }

            if self.frontier.visited_count() >= max_pages {
                break StopReason::PageLimitReached;
            }

            while tasks.len() < max_workers && self.frontier.visited_count() < max_pages {
                let Some(url) = self.frontier.pop() else {
                    break;
                };
                if !self.frontier.try_claim(&url) {
                    tracing::trace!("Discarding already visited {}", url);
                    continue;
                }
                tracing::info!(
                    "[{}/{}] {}",
                    self.frontier.visited_count(),
                    self.frontier.discovered_count(),
                    url
                );
                self.dispatch(&mut tasks, url);
            }

            if tasks.is_empty() {
                if self.frontier.is_empty() {
                    break StopReason::FrontierExhausted;
                }
                continue;
            }

            tokio::select! {
                Some(joined) = tasks.join_next() => {
                    self.handle_completion(joined);
                    completed += 1;
                    if completed % PROGRESS_INTERVAL == 0 {
                        self.log_progress();
                    }
                }
                _ = tokio::time::sleep(POLL_INTERVAL) => {}
            }
        };

        self.transition(self.state.drain(reason));
        if !tasks.is_empty() {
            tracing::info!("Waiting for {} in-flight pages", tasks.len());
        }
        while let Some(joined) = tasks.join_next().await {
            self.handle_completion(joined);
        }
        self.transition(self.state.finish());

        Ok(self.finish(reason))
    }

    /// Spawns a supervised worker for a claimed URL
    ///
    /// The worker runs in its own task so that a panic is caught by the
    /// supervisor and attributed to the URL.
    fn dispatch(&self, tasks: &mut JoinSet<WorkerOutcome>, url: Url) {
        let ctx = Arc::clone(&self.worker);
        tasks.spawn(async move {
            let worker = tokio::spawn(process_page(ctx, url.clone()));
            (url, worker.await)
        });
    }

    fn handle_completion(&self, joined: Result<WorkerOutcome, JoinError>) {
        match joined {
            Ok((url, Ok(links))) => {
                let added = self.frontier.enqueue_if_new(links);
                if !added.is_empty() {
                    tracing::debug!(
                        "{}: +{} new links (total: {})",
                        url,
                        added.len(),
                        self.frontier.discovered_count()
                    );
                }
            }
            Ok((url, Err(e))) => {
                self.errors
                    .push(ErrorRecord::task_fault(url.as_str(), describe_join_error(e)));
            }
            Err(e) => {
                tracing::error!("Worker supervisor failed: {}", e);
            }
        }
    }

    fn transition(&mut self, next: RunState) {
        if next != self.state {
            tracing::trace!("Run state: {} -> {}", self.state, next);
            self.state = next;
        }
    }

    fn log_progress(&self) {
        let stats = self.stats.snapshot();
        tracing::info!(
            "Progress: {} visited, {} discovered, {} queued, {} errors, {:.2} pages/s",
            stats.visited,
            stats.discovered,
            self.frontier.pending_len(),
            stats.errors,
            stats.pages_per_second()
        );
    }

    /// Closes the store, writes the error log and runs post-processing
    fn finish(self, reason: StopReason) -> CrawlReport {
        let output = &self.config.output;

        if let Err(e) = self.store.close() {
            tracing::warn!("Failed to close page store: {}", e);
        }

        let errors_path = output.errors_path();
        let errors_file = match write_error_log(&errors_path, &self.errors) {
            Ok(true) => Some(errors_path),
            Ok(false) => None,
            Err(e) => {
                tracing::warn!("Failed to write error log {}: {}", errors_path.display(), e);
                None
            }
        };

        let mut dedup = None;
        let mut deduplicated_file = None;
        if output.deduplicate && reason.allows_post_processing() {
            let target = output.deduplicated_path();
            match dedupe_file(&output.pages_path(), &target) {
                Ok(stats) => {
                    dedup = Some(stats);
                    deduplicated_file = Some(target);
                }
                Err(e) => tracing::warn!("Deduplication failed: {}", e),
            }
        } else if output.deduplicate {
            tracing::info!("Skipping deduplication after cancellation");
        }

        let stats = self.stats.snapshot();
        tracing::info!(
            "Crawl finished ({}): {} visited, {} discovered, {} errors in {:.2}s",
            reason,
            stats.visited,
            stats.discovered,
            stats.errors,
            stats.elapsed.as_secs_f64()
        );

        CrawlReport {
            stop_reason: reason,
            stats,
            pending: self.frontier.pending_len(),
            errors: self.errors.snapshot(),
            files: OutputFiles {
                pages: output.pages_path(),
                links: output.links_path(),
                errors: errors_file,
                deduplicated: deduplicated_file,
            },
            dedup,
        }
    }
}

/// Runs a complete crawl for a validated configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(CrawlError)` - Crawl could not start
pub async fn run_crawl(config: Config) -> Result<CrawlReport, CrawlError> {
    Coordinator::new(config)?.run().await
}

fn describe_join_error(e: JoinError) -> String {
    if e.is_panic() {
        panic_message(e.into_panic())
    } else {
        e.to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panic: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panic: {}", message)
    } else {
        "panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::FetchResult;
    use crate::state::ErrorKind;
    use crate::storage::StorageResult;
    use crate::ConfigError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct StaticFetcher;

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &Url) -> FetchResult {
            match url.path() {
                "/" => FetchResult::Success {
                    final_url: url.to_string(),
                    status_code: 200,
                    content_type: "text/html".to_string(),
                    body: r#"<p>Home</p><a href="/boom">boom</a>"#.to_string(),
                },
                "/boom" => panic!("fetcher exploded"),
                _ => FetchResult::HttpError {
                    status_code: 404,
                    reason: "Not Found".to_string(),
                },
            }
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        urls: Mutex<Vec<String>>,
    }

    impl PageStore for MemoryStore {
        fn save_page(&self, url: &str, _text: &str) -> StorageResult<()> {
            self.urls.lock().unwrap().push(url.to_string());
            Ok(())
        }

        fn saved_count(&self) -> usize {
            self.urls.lock().unwrap().len()
        }

        fn close(&self) -> StorageResult<()> {
            Ok(())
        }
    }

    fn test_config(dir: &TempDir) -> Config {
        let mut config = Config::for_seed("https://example.com/");
        config.output.directory = dir.path().to_path_buf();
        config.output.deduplicate = false;
        config
    }

    fn coordinator(config: Config) -> Result<Coordinator, CrawlError> {
        Coordinator::with_components(
            config,
            Arc::new(StaticFetcher),
            Arc::new(ScraperExtractor),
            Arc::new(MemoryStore::default()),
        )
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.crawler.max_workers = 0;

        assert!(matches!(
            coordinator(config),
            Err(CrawlError::Config(ConfigError::Validation(_)))
        ));
    }

    #[test]
    fn test_seed_without_host_rejected() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.crawler.seed_url = "https://".to_string();

        assert!(matches!(
            coordinator(config),
            Err(CrawlError::Config(ConfigError::InvalidUrl(_)))
        ));
    }

    #[test]
    fn test_unopenable_store_is_fatal() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let mut config = test_config(&dir);
        config.output.directory = blocker;

        assert!(matches!(
            Coordinator::new(config),
            Err(CrawlError::Storage(_))
        ));
    }

    #[test]
    fn test_seed_is_canonical_and_scoped() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.crawler.seed_url = "https://www.example.com/start?ref=x#top".to_string();

        let coordinator = coordinator(config).unwrap();
        assert_eq!(coordinator.seed().as_str(), "https://www.example.com/start");
        assert!(coordinator.scope().accepts("example.com"));
        assert_eq!(coordinator.stats().snapshot().discovered, 1);
    }

    #[tokio::test]
    async fn test_worker_panic_becomes_task_fault() {
        let dir = TempDir::new().unwrap();
        let report = coordinator(test_config(&dir)).unwrap().run().await.unwrap();

        assert_eq!(report.stop_reason, StopReason::FrontierExhausted);
        assert_eq!(report.stats.visited, 2);

        let faults: Vec<&ErrorRecord> = report
            .errors
            .iter()
            .filter(|r| r.kind == ErrorKind::TaskFault)
            .collect();
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].subject, "https://example.com/boom");
        assert!(faults[0].detail.contains("fetcher exploded"));

        let log = std::fs::read_to_string(dir.path().join("errors.txt")).unwrap();
        assert!(log.starts_with("https://example.com/boom | Worker fault: panic: fetcher exploded"));
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(Box::new("static")), "panic: static");
        assert_eq!(panic_message(Box::new("owned".to_string())), "panic: owned");
        assert_eq!(panic_message(Box::new(42_u8)), "panic");
    }
}
