//! Recoverable per-page errors
//!
//! Nothing recorded here stops a crawl. Each record names the URL (or raw
//! href) it concerns, the kind of failure and a human readable detail. The
//! list is appended to concurrently by workers and written out once, sorted,
//! when the crawl ends.

use crate::url::LinkRejection;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Label that introduces the page an error was found on
pub const SOURCE_LABEL: &str = "Źródło";

/// The kinds of failure a crawl recovers from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The fetch failed at the network or HTTP layer
    Transport,

    /// The response was not an HTML document
    UnsupportedContent,

    /// An href could not be resolved to a usable URL
    MalformedLink,

    /// The HTML-to-text pass faulted
    Extraction,

    /// Writing a page record failed
    Persistence,

    /// A worker task ended without returning a result
    TaskFault,
}

impl ErrorKind {
    /// Returns a stable, machine-friendly name for the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::UnsupportedContent => "unsupported_content",
            Self::MalformedLink => "malformed_link",
            Self::Extraction => "extraction",
            Self::Persistence => "persistence",
            Self::TaskFault => "task_fault",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single recovered error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    /// The URL or raw href the error concerns
    pub subject: String,

    pub kind: ErrorKind,

    /// Human readable description
    pub detail: String,

    /// The page the subject was found on, for link errors
    pub source: Option<String>,
}

impl ErrorRecord {
    pub fn new(subject: impl Into<String>, kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            kind,
            detail: detail.into(),
            source: None,
        }
    }

    /// Attaches the page the subject was found on
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn transport(url: &str, detail: impl Into<String>) -> Self {
        Self::new(url, ErrorKind::Transport, detail)
    }

    pub fn unsupported_content(url: &str, content_type: &str) -> Self {
        Self::new(
            url,
            ErrorKind::UnsupportedContent,
            format!("Not HTML ({})", content_type),
        )
    }

    pub fn extraction(url: &str, detail: impl fmt::Display) -> Self {
        Self::new(
            url,
            ErrorKind::Extraction,
            format!("HTML parse error: {}", detail),
        )
    }

    pub fn persistence(url: &str, detail: impl fmt::Display) -> Self {
        Self::new(
            url,
            ErrorKind::Persistence,
            format!("Failed to write page: {}", detail),
        )
    }

    pub fn task_fault(url: &str, detail: impl fmt::Display) -> Self {
        Self::new(
            url,
            ErrorKind::TaskFault,
            format!("Worker fault: {}", detail),
        )
    }

    /// Formats the record as one error-log line
    ///
    /// # Examples
    ///
    /// ```
    /// use sitescribe::state::{ErrorKind, ErrorRecord};
    ///
    /// let record = ErrorRecord::new("https://example.com/x", ErrorKind::Transport, "HTTP 404")
    ///     .with_source("https://example.com/");
    /// assert_eq!(
    ///     record.to_line(),
    ///     "https://example.com/x | HTTP 404 | Źródło: https://example.com/"
    /// );
    /// ```
    pub fn to_line(&self) -> String {
        match &self.source {
            Some(source) => format!(
                "{} | {} | {}: {}",
                self.subject, self.detail, SOURCE_LABEL, source
            ),
            None => format!("{} | {}", self.subject, self.detail),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

impl From<LinkRejection> for ErrorRecord {
    fn from(rejection: LinkRejection) -> Self {
        let detail = rejection.detail();
        Self::new(rejection.href, ErrorKind::MalformedLink, detail).with_source(rejection.source)
    }
}

/// Append-only error list shared by all workers
#[derive(Debug, Default)]
pub struct ErrorList {
    records: Mutex<Vec<ErrorRecord>>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record
    pub fn push(&self, record: ErrorRecord) {
        tracing::warn!("{}", record);
        self.lock().push(record);
    }

    /// Appends several records under a single lock
    pub fn extend(&self, records: impl IntoIterator<Item = ErrorRecord>) {
        let records: Vec<ErrorRecord> = records.into_iter().collect();
        if records.is_empty() {
            return;
        }
        for record in &records {
            tracing::warn!("{}", record);
        }
        self.lock().extend(records);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns a copy of the records collected so far
    pub fn snapshot(&self) -> Vec<ErrorRecord> {
        self.lock().clone()
    }

    /// Returns the formatted log lines, sorted lexicographically
    pub fn sorted_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.lock().iter().map(ErrorRecord::to_line).collect();
        lines.sort();
        lines
    }

    /// Counts records of one kind
    pub fn count_kind(&self, kind: ErrorKind) -> usize {
        self.lock().iter().filter(|r| r.kind == kind).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ErrorRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
