use crate::url::domain::DomainScope;
use std::fmt;
use url::Url;

/// Href prefixes that never lead to another page and are skipped silently
const NON_NAVIGABLE_PREFIXES: &[&str] = &["mailto:", "tel:", "javascript:", "#"];

/// File extensions that are never fetched as pages
const BINARY_EXTENSIONS: &[&str] = &[
    "pdf", "jpg", "png", "zip", "doc", "docx", "xls", "xlsx", "gif", "jpeg", "svg", "mp4", "avi",
    "mp3",
];

/// Why a link was turned into an error record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// The link resolves to, or is written as, a URL without a host
    Malformed,

    /// The URL parser refused the link; carries the parser's description
    ParseFailure(String),
}

/// A link that should have been followable but could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRejection {
    /// The raw href as it appeared on the page
    pub href: String,

    /// The page the href was found on
    pub source: String,

    pub reason: RejectionReason,
}

impl LinkRejection {
    /// Human readable description of the rejection
    pub fn detail(&self) -> String {
        match &self.reason {
            RejectionReason::Malformed => "Malformed URL (missing scheme or host)".to_string(),
            RejectionReason::ParseFailure(e) => format!("Link parse error: {}", e),
        }
    }
}

/// Why a link was dropped without being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NonNavigable,
    External,
    UnsupportedScheme,
    BinaryFile,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NonNavigable => "non-navigable",
            Self::External => "external",
            Self::UnsupportedScheme => "unsupported scheme",
            Self::BinaryFile => "binary file",
        };
        f.write_str(label)
    }
}

/// Outcome of normalizing a single href
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    Accepted(Url),
    Rejected(LinkRejection),
    Skipped(SkipReason),
}

/// Result of normalizing every href found on one page
#[derive(Debug, Clone, Default)]
pub struct NormalizedLinks {
    /// Canonical in-scope page URLs, in page order (duplicates kept)
    pub accepted: Vec<Url>,

    /// Links that are reported as errors
    pub rejected: Vec<LinkRejection>,
}

/// Turns raw hrefs into canonical, in-scope, fetchable page URLs
///
/// # Normalization Steps
///
/// 1. Skip `mailto:`, `tel:`, `javascript:` and `#fragment` hrefs
/// 2. Resolve the href against the page URL
/// 3. Reject as malformed an `http:`/`https:` href of the other scheme
///    written without `//`, and any resolved URL without a host
/// 4. Skip hosts outside the [`DomainScope`]
/// 5. Canonicalize to scheme + host + path (query and fragment dropped)
/// 6. Skip paths ending in a binary or document extension
///
/// A resolution failure becomes a rejection carrying the parser error.
#[derive(Debug, Clone)]
pub struct LinkNormalizer {
    scope: DomainScope,
}

impl LinkNormalizer {
    pub fn new(scope: DomainScope) -> Self {
        Self { scope }
    }

    /// Normalizes every href found on the page at `base`
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use sitescribe::url::{DomainScope, LinkNormalizer};
    ///
    /// let normalizer = LinkNormalizer::new(DomainScope::from_host("example.com"));
    /// let base = Url::parse("https://example.com/a/").unwrap();
    /// let links = normalizer.normalize(&base, &["../b.html".to_string()]);
    /// assert_eq!(links.accepted[0].as_str(), "https://example.com/b.html");
    /// ```
    pub fn normalize<S: AsRef<str>>(&self, base: &Url, hrefs: &[S]) -> NormalizedLinks {
        let mut links = NormalizedLinks::default();

        for href in hrefs {
            let href: &str = href.as_ref();
            match self.normalize_one(base, href) {
                LinkOutcome::Accepted(url) => links.accepted.push(url),
                LinkOutcome::Rejected(rejection) => links.rejected.push(rejection),
                LinkOutcome::Skipped(reason) => {
                    tracing::trace!("Skipping link {:?} on {}: {}", href, base, reason);
                }
            }
        }

        links
    }

    /// Normalizes a single href found on the page at `base`
    pub fn normalize_one(&self, base: &Url, href: &str) -> LinkOutcome {
        let href = href.trim();

        if NON_NAVIGABLE_PREFIXES
            .iter()
            .any(|prefix| href.starts_with(prefix))
        {
            return LinkOutcome::Skipped(SkipReason::NonNavigable);
        }

        if lacks_authority(base, href) {
            return LinkOutcome::Rejected(LinkRejection {
                href: href.to_string(),
                source: base.to_string(),
                reason: RejectionReason::Malformed,
            });
        }

        let resolved = match base.join(href) {
            Ok(url) => url,
            Err(e) => {
                return LinkOutcome::Rejected(LinkRejection {
                    href: href.to_string(),
                    source: base.to_string(),
                    reason: RejectionReason::ParseFailure(e.to_string()),
                });
            }
        };

        // Every hostless result counts as a broken internal link
        if resolved.host_str().map_or(true, str::is_empty) {
            return LinkOutcome::Rejected(LinkRejection {
                href: href.to_string(),
                source: base.to_string(),
                reason: RejectionReason::Malformed,
            });
        }

        if !self.scope.accepts_url(&resolved) {
            return LinkOutcome::Skipped(SkipReason::External);
        }

        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            return LinkOutcome::Skipped(SkipReason::UnsupportedScheme);
        }

        let canonical = canonicalize(resolved);

        if has_binary_extension(&canonical) {
            return LinkOutcome::Skipped(SkipReason::BinaryFile);
        }

        LinkOutcome::Accepted(canonical)
    }
}

/// Returns true for scheme typos such as `http:/contact` or `http:contact`
///
/// The URL parser would invent a host from the path. An href that repeats
/// the page's own scheme stays relative, as browsers treat it.
fn lacks_authority(base: &Url, href: &str) -> bool {
    let Some((scheme, rest)) = href.split_once(':') else {
        return false;
    };
    let scheme = scheme.to_ascii_lowercase();
    (scheme == "http" || scheme == "https")
        && scheme != base.scheme()
        && !rest.starts_with("//")
}

/// Reduces a URL to its identity: scheme, host, port and path
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitescribe::url::canonicalize;
///
/// let url = Url::parse("https://user@example.com/page?id=3#top").unwrap();
/// assert_eq!(canonicalize(url).as_str(), "https://example.com/page");
/// ```
pub fn canonicalize(mut url: Url) -> Url {
    url.set_query(None);
    url.set_fragment(None);
    // Both setters only fail for URLs that cannot carry credentials at all
    let _ = url.set_username("");
    let _ = url.set_password(None);
    url
}

/// Returns true if the URL path ends in a known binary/document extension
pub fn has_binary_extension(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    BINARY_EXTENSIONS.iter().any(|ext| {
        path.strip_suffix(ext)
            .is_some_and(|rest| rest.ends_with('.'))
    })
}
