//! Frontier and visited set
//!
//! This module owns the crawl's shared URL bookkeeping:
//! - The FIFO queue of discovered, not yet processed URLs
//! - The set of URLs that are queued
//! - The set of URLs that were claimed for processing
//!
//! All three live behind one mutex so that "is this URL new?" and "add it"
//! are a single step. A URL is processed at most once per crawl.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

#[derive(Debug, Default)]
struct Inner {
    /// URLs claimed for processing
    visited: HashSet<String>,

    /// Every URL ever enqueued; never shrinks
    queued: HashSet<String>,

    /// URLs waiting to be dispatched, in discovery order
    queue: VecDeque<Url>,
}

/// Thread-safe frontier with claim-once semantics
///
/// # Example
///
/// ```
/// use sitescribe::crawler::Frontier;
/// use url::Url;
///
/// let seed = Url::parse("https://example.com/").unwrap();
/// let frontier = Frontier::new(seed.clone());
///
/// let next = frontier.pop().unwrap();
/// assert!(frontier.try_claim(&next));
/// assert!(!frontier.try_claim(&next));
///
/// // Already known URLs are never queued twice
/// assert!(frontier.enqueue_if_new(vec![seed]).is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Frontier {
    inner: Mutex<Inner>,
}

impl Frontier {
    /// Creates a frontier holding only the seed URL
    pub fn new(seed: Url) -> Self {
        let frontier = Self::default();
        frontier.enqueue_if_new(vec![seed]);
        frontier
    }

    /// Atomically marks a URL as visited
    ///
    /// Returns `true` only for the first caller; every later call for the
    /// same URL, from any thread, returns `false`.
    pub fn try_claim(&self, url: &Url) -> bool {
        self.lock().visited.insert(url.as_str().to_string())
    }

    /// Queues every URL that was never visited nor queued before
    ///
    /// Duplicates inside `urls` are queued once. Returns the URLs that were
    /// actually added, in input order.
    pub fn enqueue_if_new(&self, urls: Vec<Url>) -> Vec<Url> {
        let mut inner = self.lock();
        let mut added = Vec::new();

        for url in urls {
            let key = url.as_str();
            if inner.visited.contains(key) || inner.queued.contains(key) {
                continue;
            }
            inner.queued.insert(key.to_string());
            inner.queue.push_back(url.clone());
            added.push(url);
        }

        added
    }

    /// Removes the oldest queued URL without blocking
    pub fn pop(&self) -> Option<Url> {
        self.lock().queue.pop_front()
    }

    /// Returns true if no URL is waiting to be dispatched
    pub fn is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }

    /// Number of URLs waiting to be dispatched
    pub fn pending_len(&self) -> usize {
        self.lock().queue.len()
    }

    /// Number of URLs claimed so far
    pub fn visited_count(&self) -> usize {
        self.lock().visited.len()
    }

    /// Number of distinct URLs ever queued
    pub fn discovered_count(&self) -> usize {
        self.lock().queued.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
