//! HTML to text extraction
//!
//! This module turns a fetched HTML document into:
//! - The raw `href` of every `<a>` element, in document order
//! - A plain text rendition of the page
//!
//! # Text Rules
//!
//! - `script`, `style`, `head`, `title`, `meta`, `iframe` and `noscript`
//!   elements are dropped with their content
//! - `<br>` becomes a line break
//! - Paragraphs and headings are followed by a blank line
//! - List items are prefixed with `• ` and end with a line break
//! - Every line is trimmed, runs of blank lines collapse to one and the
//!   whole text is trimmed

use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

/// Elements whose content never reaches the extracted text
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "head", "title", "meta", "iframe", "noscript",
];

/// Elements followed by a blank line
const BLOCK_ELEMENTS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Marker placed before every list item
pub const BULLET: &str = "• ";

/// Everything extracted from one HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Raw `href` values, unresolved
    pub links: Vec<String>,

    /// Non-fatal problems found while extracting
    pub errors: Vec<String>,

    /// Normalized plain text
    pub text: String,
}

/// Anything that can split an HTML page into links and text
pub trait TextExtractor: Send + Sync {
    /// Extracts links and text from a page fetched from `base`
    ///
    /// # Returns
    ///
    /// * `Ok(ExtractedPage)` - Extraction succeeded, possibly with non-fatal errors
    /// * `Err(String)` - The document could not be processed at all
    fn extract(&self, base: &Url, html: &str) -> Result<ExtractedPage, String>;
}

/// [`TextExtractor`] built on the `scraper` HTML parser
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperExtractor;

impl TextExtractor for ScraperExtractor {
    fn extract(&self, base: &Url, html: &str) -> Result<ExtractedPage, String> {
        let document = Html::parse_document(html);

        let links = extract_hrefs(&document)?;

        let mut raw = String::new();
        collect_text(document.root_element(), &mut raw);
        let text = clean_text(&raw);

        tracing::trace!(
            "Extracted {} links and {} bytes of text from {}",
            links.len(),
            text.len(),
            base
        );

        Ok(ExtractedPage {
            links,
            errors: Vec::new(),
            text,
        })
    }
}

/// Returns the raw `href` of every anchor, in document order
fn extract_hrefs(document: &Html) -> Result<Vec<String>, String> {
    let selector = Selector::parse("a[href]").map_err(|e| format!("{:?}", e))?;

    Ok(document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect())
}

/// Appends the text under `element` to `out`, applying the layout rules
fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = child.value().name();

                if SKIPPED_ELEMENTS.contains(&name) {
                    continue;
                }

                if name == "br" {
                    out.push('\n');
                    continue;
                }

                if name == "li" {
                    out.push_str(BULLET);
                }

                collect_text(child, out);

                if name == "li" {
                    out.push('\n');
                } else if BLOCK_ELEMENTS.contains(&name) {
                    out.push_str("\n\n");
                }
            }
            _ => {}
        }
    }
}

/// Trims every line, collapses blank-line runs to one and trims the result
///
/// # Examples
///
/// ```
/// use sitescribe::crawler::clean_text;
///
/// assert_eq!(clean_text("  a  \n\n\n\n  b \n"), "a\n\nb");
/// ```
pub fn clean_text(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut pending_blank = false;

    for line in raw.split('\n').map(str::trim) {
        if line.is_empty() {
            pending_blank = !text.is_empty();
            continue;
        }
        if !text.is_empty() {
            text.push('\n');
            if pending_blank {
                text.push('\n');
            }
        }
        text.push_str(line);
        pending_blank = false;
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    fn extract(html: &str) -> ExtractedPage {
        ScraperExtractor.extract(&base_url(), html).unwrap()
    }

    #[test]
    fn test_paragraphs_separated_by_blank_line() {
        let page = extract("<html><body><p>First</p><p>Second</p></body></html>");
        assert_eq!(page.text, "First\n\nSecond");
    }

    #[test]
    fn test_headings_followed_by_blank_line() {
        let page = extract("<body><h1>Title</h1><p>Body text</p><h3>Sub</h3>tail</body>");
        assert_eq!(page.text, "Title\n\nBody text\n\nSub\n\ntail");
    }

    #[test]
    fn test_skipped_elements() {
        let html = r#"
            <html>
            <head><title>Hidden title</title><meta charset="utf-8"><style>p { color: red }</style></head>
            <body>
                <script>var x = 1;</script>
                <noscript>Enable JS</noscript>
                <iframe src="/frame">frame text</iframe>
                <p>Visible</p>
            </body>
            </html>
        "#;
        let page = extract(html);
        assert_eq!(page.text, "Visible");
    }

    #[test]
    fn test_br_becomes_newline() {
        let page = extract("<body><p>line one<br>line two<br/>line three</p></body>");
        assert_eq!(page.text, "line one\nline two\nline three");
    }

    #[test]
    fn test_list_items_get_bullets() {
        let page = extract("<body><ul><li>Apples</li><li>Pears</li></ul></body>");
        assert_eq!(page.text, "• Apples\n• Pears");
    }

    #[test]
    fn test_lines_trimmed_and_blank_runs_collapsed() {
        let html = "<body><div>   indented   </div>\n\n\n\n<div>\n\n\n  next  \n</div></body>";
        let page = extract(html);
        assert_eq!(page.text, "indented\n\nnext");
    }

    #[test]
    fn test_no_triple_newlines() {
        let page = extract("<body><p>a</p><p></p><p></p><h2>b</h2><p>c</p></body>");
        assert!(!page.text.contains("\n\n\n"));
        assert_eq!(page.text, "a\n\nb\n\nc");
    }

    #[test]
    fn test_inline_elements_keep_text_together() {
        let page = extract("<body><p>Hello <b>bold</b> and <a href=\"/x\">link</a>.</p></body>");
        assert_eq!(page.text, "Hello bold and link.");
    }

    #[test]
    fn test_links_are_raw_and_ordered() {
        let html = r##"
            <html>
            <body>
                <a href="/page1">Link 1</a>
                <a href="mailto:test@example.com">Mail</a>
                <a>No href</a>
                <a href="../up">Up</a>
                <a href="#section">Jump</a>
                <a href="https://other.com/page3">External</a>
            </body>
            </html>
        "##;
        let page = extract(html);
        assert_eq!(
            page.links,
            vec![
                "/page1",
                "mailto:test@example.com",
                "../up",
                "#section",
                "https://other.com/page3"
            ]
        );
        assert!(page.errors.is_empty());
    }

    #[test]
    fn test_list_item_links_keep_text() {
        let page = extract("<body><ul><li><a href=\"/a\">About</a></li></ul></body>");
        assert_eq!(page.links, vec!["/a"]);
        assert_eq!(page.text, "• About");
    }

    #[test]
    fn test_empty_document() {
        let page = extract("");
        assert!(page.links.is_empty());
        assert_eq!(page.text, "");
    }

    #[test]
    fn test_malformed_html_is_tolerated() {
        let page = extract("<body><p>unclosed <div>still <b>here</body>");
        assert!(page.text.contains("unclosed"));
        assert!(page.text.contains("still here"));
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("\n\n\n"), "");
        assert_eq!(clean_text("a\nb"), "a\nb");
        assert_eq!(clean_text("a\n \n\t\nb"), "a\n\nb");
        assert_eq!(clean_text("  \n a \n\n\n"), "a");
    }
}
