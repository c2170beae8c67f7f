use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared, one-way cancellation signal
///
/// Clones observe the same flag. Once raised it stays raised: the crawl
/// stops dispatching, lets in-flight fetches finish and skips
/// post-processing.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the signal
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            tracing::info!("Cancellation requested");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
