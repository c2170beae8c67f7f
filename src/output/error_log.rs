//! Error log writer
//!
//! The log is written once, when the crawl ends, and only if something went
//! wrong. Lines are sorted so that all errors for one URL sit together.

use crate::state::ErrorList;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes the sorted error log to `path`
///
/// # Returns
///
/// * `Ok(true)` - The log was written
/// * `Ok(false)` - No errors were recorded; no file was created
/// * `Err(io::Error)` - The file could not be written
pub fn write_error_log(path: &Path, errors: &ErrorList) -> io::Result<bool> {
    let lines = errors.sorted_lines();
    if lines.is_empty() {
        return Ok(false);
    }

    let mut writer = BufWriter::new(File::create(path)?);
    for line in &lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} errors to {}", lines.len(), path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ErrorRecord;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_no_errors_no_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("errors.txt");

        assert!(!write_error_log(&path, &ErrorList::new()).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_lines_sorted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("errors.txt");

        let errors = ErrorList::new();
        errors.push(ErrorRecord::transport("https://example.com/z", "HTTP 500"));
        errors.push(
            ErrorRecord::new(
                "../x",
                crate::state::ErrorKind::MalformedLink,
                "Malformed URL (missing scheme or host)",
            )
            .with_source("https://example.com/"),
        );
        errors.push(ErrorRecord::unsupported_content(
            "https://example.com/a.rss",
            "application/rss+xml",
        ));

        assert!(write_error_log(&path, &errors).unwrap());

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "../x | Malformed URL (missing scheme or host) | Źródło: https://example.com/\n\
             https://example.com/a.rss | Not HTML (application/rss+xml)\n\
             https://example.com/z | HTTP 500\n"
        );
    }
}
