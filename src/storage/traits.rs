//! Storage traits and error types
//!
//! This module defines the trait interface for page stores and the
//! associated error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store is closed")]
    Closed,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for durable page stores
///
/// A store is shared by every worker of a crawl, so implementations must be
/// safe to call from many tasks at once. Each call to [`save_page`] must
/// produce one complete record that is never interleaved with another.
///
/// [`save_page`]: PageStore::save_page
pub trait PageStore: Send + Sync {
    /// Appends one page record
    ///
    /// # Arguments
    ///
    /// * `url` - The canonical URL of the page
    /// * `text` - The normalized text extracted from the page
    fn save_page(&self, url: &str, text: &str) -> StorageResult<()>;

    /// Number of records written so far
    fn saved_count(&self) -> usize;

    /// Flushes and releases the underlying sinks
    ///
    /// Saving after `close` fails with [`StorageError::Closed`].
    fn close(&self) -> StorageResult<()>;
}
