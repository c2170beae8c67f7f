//! Storage module for persisting crawled pages
//!
//! - `PageStore`: the append-only, thread-safe sink every worker writes to
//! - `TextFileStore`: the plain text implementation used by the crawler

mod text_file;
mod traits;

pub use text_file::{TextFileStore, RECORD_SEPARATOR};
pub use traits::{PageStore, StorageError, StorageResult};

use std::path::Path;

/// Opens the text page store at the given paths
///
/// # Arguments
///
/// * `pages_path` - File receiving the page records
/// * `links_path` - File receiving one saved URL per line
///
/// # Returns
///
/// * `Ok(TextFileStore)` - Store ready for writing
/// * `Err(StorageError)` - Either file could not be created
pub fn open_store(pages_path: &Path, links_path: &Path) -> StorageResult<TextFileStore> {
    TextFileStore::create(pages_path, links_path)
}
