//! Plain text page store
//!
//! Pages are appended to a single text file as delimited records:
//!
//! ```text
//! <url>
//!
//! <text>
//!
//! ________ (80 underscores)
//!
//! ```
//!
//! Every saved URL is also appended, one per line, to a separate links file.

use crate::storage::traits::{PageStore, StorageError, StorageResult};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Line that terminates every page record
pub const RECORD_SEPARATOR: &str = "________________________________________________________________________________";

struct Sinks {
    pages: BufWriter<File>,
    links: BufWriter<File>,
    saved: usize,
}

/// Page store backed by a pages file and a visited-links file
///
/// Both files are written under one lock so that a record and its links
/// entry always appear together.
pub struct TextFileStore {
    pages_path: PathBuf,
    links_path: PathBuf,
    sinks: Mutex<Option<Sinks>>,
}

impl TextFileStore {
    /// Creates (or truncates) the pages and links files
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if either file cannot be opened. A crawl
    /// cannot start without its store, so callers treat this as fatal.
    pub fn create(pages_path: &Path, links_path: &Path) -> StorageResult<Self> {
        for path in [pages_path, links_path] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
        }

        let pages = BufWriter::new(File::create(pages_path)?);
        let links = BufWriter::new(File::create(links_path)?);

        tracing::debug!(
            "Opened page store at {} (links: {})",
            pages_path.display(),
            links_path.display()
        );

        Ok(Self {
            pages_path: pages_path.to_path_buf(),
            links_path: links_path.to_path_buf(),
            sinks: Mutex::new(Some(Sinks {
                pages,
                links,
                saved: 0,
            })),
        })
    }

    pub fn pages_path(&self) -> &Path {
        &self.pages_path
    }

    pub fn links_path(&self) -> &Path {
        &self.links_path
    }

    fn lock(&self) -> MutexGuard<'_, Option<Sinks>> {
        self.sinks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PageStore for TextFileStore {
    fn save_page(&self, url: &str, text: &str) -> StorageResult<()> {
        let mut guard = self.lock();
        let sinks = guard.as_mut().ok_or(StorageError::Closed)?;

        write!(
            sinks.pages,
            "{}\n\n{}\n\n{}\n\n",
            url, text, RECORD_SEPARATOR
        )?;
        sinks.pages.flush()?;

        writeln!(sinks.links, "{}", url)?;
        sinks.links.flush()?;

        sinks.saved += 1;
        Ok(())
    }

    fn saved_count(&self) -> usize {
        self.lock().as_ref().map_or(0, |sinks| sinks.saved)
    }

    fn close(&self) -> StorageResult<()> {
        if let Some(mut sinks) = self.lock().take() {
            sinks.pages.flush()?;
            sinks.links.flush()?;
            tracing::debug!("Closed page store after {} records", sinks.saved);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn create_store(dir: &TempDir) -> TextFileStore {
        TextFileStore::create(&dir.path().join("pages.txt"), &dir.path().join("links.txt"))
            .unwrap()
    }

    #[test]
    fn test_record_format() {
        let dir = TempDir::new().unwrap();
        let store = create_store(&dir);

        store.save_page("https://example.com/", "Hello\n\nWorld").unwrap();

        let pages = fs::read_to_string(store.pages_path()).unwrap();
        assert_eq!(
            pages,
            format!(
                "https://example.com/\n\nHello\n\nWorld\n\n{}\n\n",
                RECORD_SEPARATOR
            )
        );

        let links = fs::read_to_string(store.links_path()).unwrap();
        assert_eq!(links, "https://example.com/\n");
        assert_eq!(store.saved_count(), 1);
    }

    #[test]
    fn test_separator_length() {
        assert_eq!(RECORD_SEPARATOR.len(), 80);
        assert!(RECORD_SEPARATOR.chars().all(|c| c == '_'));
    }

    #[test]
    fn test_records_are_visible_without_close() {
        let dir = TempDir::new().unwrap();
        let store = create_store(&dir);

        store.save_page("https://example.com/a", "A").unwrap();
        store.save_page("https://example.com/b", "B").unwrap();

        let links = fs::read_to_string(store.links_path()).unwrap();
        assert_eq!(links, "https://example.com/a\nhttps://example.com/b\n");
    }

    #[test]
    fn test_create_truncates_existing_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("pages.txt"), "old content").unwrap();

        let store = create_store(&dir);
        assert_eq!(fs::read_to_string(store.pages_path()).unwrap(), "");
    }

    #[test]
    fn test_create_makes_parent_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("out").join("run");
        let store =
            TextFileStore::create(&nested.join("pages.txt"), &nested.join("links.txt")).unwrap();
        store.save_page("https://example.com/", "x").unwrap();
        assert!(nested.join("pages.txt").exists());
    }

    #[test]
    fn test_create_fails_on_unwritable_path() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let result = TextFileStore::create(&blocker.join("pages.txt"), &blocker.join("links.txt"));
        assert!(matches!(result, Err(StorageError::Io(_))));
    }

    #[test]
    fn test_save_after_close_fails() {
        let dir = TempDir::new().unwrap();
        let store = create_store(&dir);

        store.save_page("https://example.com/", "x").unwrap();
        store.close().unwrap();
        store.close().unwrap();

        assert!(matches!(
            store.save_page("https://example.com/b", "y"),
            Err(StorageError::Closed)
        ));
    }

    #[test]
    fn test_concurrent_records_do_not_interleave() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(create_store(&dir));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..25 {
                        let url = format!("https://example.com/{}/{}", t, i);
                        let text = format!("line one {}\nline two {}", t, i);
                        store.save_page(&url, &text).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.saved_count(), 200);

        let pages = fs::read_to_string(store.pages_path()).unwrap();
        let records: Vec<&str> = pages
            .split(RECORD_SEPARATOR)
            .filter(|r| !r.trim().is_empty())
            .collect();
        assert_eq!(records.len(), 200);

        for record in records {
            let lines: Vec<&str> = record.trim().lines().collect();
            assert_eq!(lines.len(), 4, "record was interleaved: {:?}", record);
            let suffix = lines[0].trim_start_matches("https://example.com/").replace('/', " ");
            assert_eq!(lines[2], format!("line one {}", suffix));
            assert_eq!(lines[3], format!("line two {}", suffix));
        }
    }
}
