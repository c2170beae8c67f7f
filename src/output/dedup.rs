//! Line deduplication within page sections
//!
//! Pages frequently repeat navigation, footer and cookie banner lines. This
//! pass keeps the first occurrence of every line inside one section and
//! drops the rest. Sections are never compared against each other.

use crate::storage::RECORD_SEPARATOR;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

/// Separator placed between sections of the deduplicated output
pub const SECTION_SEPARATOR: &str = "__________________________________________________";

/// Counters collected by a deduplication pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupStats {
    /// Number of sections processed
    pub sections: usize,

    /// Lines read, across all sections
    pub total_lines: usize,

    /// Lines kept, across all sections
    pub unique_lines: usize,
}

impl DedupStats {
    /// Lines dropped as repeats
    pub fn removed_lines(&self) -> usize {
        self.total_lines - self.unique_lines
    }

    /// Share of lines removed, in percent
    pub fn saved_percent(&self) -> f64 {
        if self.total_lines == 0 {
            0.0
        } else {
            self.removed_lines() as f64 / self.total_lines as f64 * 100.0
        }
    }
}

/// Removes repeated lines from one page's text, preserving order
///
/// Lines are compared by exact equality, so a repeated blank line is
/// dropped like any other line.
///
/// # Examples
///
/// ```
/// use sitescribe::output::dedupe;
///
/// assert_eq!(dedupe("a\nb\na\n\nb"), "a\nb\n");
/// assert_eq!(dedupe("x\ny"), "x\ny");
/// ```
pub fn dedupe(text: &str) -> String {
    dedupe_counted(text).0
}

/// Deduplicates a section and reports (text, lines read, lines kept)
fn dedupe_counted(text: &str) -> (String, usize, usize) {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    let mut total = 0;

    for line in text.split('\n') {
        total += 1;
        if seen.insert(line) {
            kept.push(line);
        }
    }

    let unique = kept.len();
    (kept.join("\n"), total, unique)
}

/// Deduplicates every section of a page store independently
///
/// The content is split on the page store's record separator. A trailing
/// section holding only whitespace is ignored. Output sections are joined
/// with [`SECTION_SEPARATOR`], each on its own line.
pub fn dedupe_sections(content: &str) -> (String, DedupStats) {
    let mut sections: Vec<&str> = content.split(RECORD_SEPARATOR).collect();
    if sections.last().is_some_and(|last| last.trim().is_empty()) {
        sections.pop();
    }

    let mut stats = DedupStats {
        sections: sections.len(),
        ..DedupStats::default()
    };
    let mut output = String::with_capacity(content.len());

    for (i, section) in sections.iter().enumerate() {
        let (deduped, total, unique) = dedupe_counted(section);
        stats.total_lines += total;
        stats.unique_lines += unique;

        output.push_str(&deduped);

        if i + 1 < sections.len() {
            if !deduped.ends_with('\n') {
                output.push('\n');
            }
            output.push_str(SECTION_SEPARATOR);
            output.push('\n');
        }

        if (i + 1) % 100 == 0 {
            tracing::debug!("Deduplicated {}/{} sections", i + 1, sections.len());
        }
    }

    (output, stats)
}

/// Runs [`dedupe_sections`] over a page store file
///
/// # Arguments
///
/// * `input` - The page store to read
/// * `output` - File receiving the deduplicated sections (overwritten)
///
/// # Returns
///
/// * `Ok(DedupStats)` - Counters for the pass
/// * `Err(io::Error)` - Either file could not be read or written
pub fn dedupe_file(input: &Path, output: &Path) -> io::Result<DedupStats> {
    let content = fs::read_to_string(input)?;
    let (deduped, stats) = dedupe_sections(&content);
    fs::write(output, deduped)?;

    tracing::info!(
        "Deduplicated {} sections: {} of {} lines kept ({:.1}% removed)",
        stats.sections,
        stats.unique_lines,
        stats.total_lines,
        stats.saved_percent()
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(url: &str, text: &str) -> String {
        format!("{}\n\n{}\n\n{}\n\n", url, text, RECORD_SEPARATOR)
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        assert_eq!(dedupe("a\nb\na\n\nb"), "a\nb\n");
    }

    #[test]
    fn test_dedupe_unique_unchanged() {
        let text = "first\nsecond\n\nthird";
        assert_eq!(dedupe(text), text);
    }

    #[test]
    fn test_dedupe_empty() {
        assert_eq!(dedupe(""), "");
    }

    #[test]
    fn test_dedupe_preserves_order() {
        assert_eq!(dedupe("c\nb\na\nb\nc\nd"), "c\nb\na\nd");
    }

    #[test]
    fn test_dedupe_exact_equality() {
        assert_eq!(dedupe("Menu\nmenu\nMenu \nMenu"), "Menu\nmenu\nMenu ");
    }

    #[test]
    fn test_sections_are_independent() {
        let content = format!(
            "{}{}",
            record("https://example.com/a", "Home\nAbout\nHome"),
            record("https://example.com/b", "Home\nContact")
        );

        let (output, stats) = dedupe_sections(&content);

        assert_eq!(stats.sections, 2);
        assert!(output.contains("https://example.com/a\n\nHome\nAbout"));
        assert!(output.contains("https://example.com/b\nHome\nContact"));
        assert_eq!(output.matches("Home").count(), 2);
        assert_eq!(output.matches(SECTION_SEPARATOR).count(), 1);
        assert!(!output.contains(RECORD_SEPARATOR));
    }

    #[test]
    fn test_section_output_format() {
        let content = format!("{}{}", record("u1", "x\nx"), record("u2", "y"));
        let (output, _) = dedupe_sections(&content);

        assert_eq!(
            output,
            format!("u1\n\nx\n{}\n\nu2\ny", SECTION_SEPARATOR)
        );
    }

    #[test]
    fn test_section_stats() {
        let content = format!("{}{}", record("u1", "x\nx"), record("u2", "y"));
        let (_, stats) = dedupe_sections(&content);

        // "u1\n\nx\nx\n\n" -> 6 lines, 3 kept; "\n\nu2\n\ny\n\n" -> 7 lines, 3 kept
        assert_eq!(stats.total_lines, 13);
        assert_eq!(stats.unique_lines, 6);
        assert_eq!(stats.removed_lines(), 7);
        assert!((stats.saved_percent() - 53.846).abs() < 0.01);
    }

    #[test]
    fn test_empty_store() {
        let (output, stats) = dedupe_sections("");
        assert_eq!(output, "");
        assert_eq!(stats, DedupStats::default());
        assert_eq!(stats.saved_percent(), 0.0);
    }

    #[test]
    fn test_separator_lengths_differ() {
        assert_eq!(SECTION_SEPARATOR.len(), 50);
        assert!(SECTION_SEPARATOR.chars().all(|c| c == '_'));
        assert_ne!(SECTION_SEPARATOR.len(), RECORD_SEPARATOR.len());
    }

    #[test]
    fn test_dedupe_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("pages.txt");
        let output = dir.path().join("pages_unique.txt");
        fs::write(&input, record("u1", "a\na\nb")).unwrap();

        let stats = dedupe_file(&input, &output).unwrap();

        assert_eq!(stats.sections, 1);
        assert_eq!(fs::read_to_string(&output).unwrap(), "u1\n\na\nb");
    }

    #[test]
    fn test_dedupe_file_missing_input() {
        let dir = TempDir::new().unwrap();
        let result = dedupe_file(&dir.path().join("missing.txt"), &dir.path().join("out.txt"));
        assert!(result.is_err());
    }
}
