use crate::UrlError;
use url::Url;

/// Returns the host identity of a URL: its host plus any explicit port
///
/// The host is lowercase because the URL parser normalizes it. Default
/// ports are not part of the identity, so `https://example.com:443/` and
/// `https://example.com/` share the host `example.com`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitescribe::url::site_host;
///
/// let url = Url::parse("https://Example.COM/path").unwrap();
/// assert_eq!(site_host(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(site_host(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn site_host(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// The set of hosts that belong to the crawl's target site
///
/// A scope accepts exactly two host strings: the seed's host and its
/// `www.`-toggled alias. There is no wildcard or suffix matching, so every
/// other subdomain is out of scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainScope {
    hosts: [String; 2],
}

impl DomainScope {
    /// Derives the scope from a seed URL
    ///
    /// # Errors
    ///
    /// Returns `UrlError::MissingHost` when the seed has no host.
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use sitescribe::url::DomainScope;
    ///
    /// let scope = DomainScope::from_seed(&Url::parse("https://example.com/").unwrap()).unwrap();
    /// assert!(scope.accepts("example.com"));
    /// assert!(scope.accepts("www.example.com"));
    /// assert!(!scope.accepts("blog.example.com"));
    /// ```
    pub fn from_seed(seed: &Url) -> Result<Self, UrlError> {
        let host = site_host(seed).ok_or_else(|| UrlError::MissingHost(seed.to_string()))?;
        Ok(Self::from_host(host))
    }

    /// Builds the scope for a known host string
    pub fn from_host(host: impl Into<String>) -> Self {
        let host = host.into();
        let alias = match host.strip_prefix("www.") {
            Some(bare) => bare.to_string(),
            None => format!("www.{}", host),
        };
        Self {
            hosts: [host, alias],
        }
    }

    /// Returns true if the host string is one of the two accepted hosts
    pub fn accepts(&self, host: &str) -> bool {
        self.hosts.iter().any(|accepted| accepted == host)
    }

    /// Returns true if the URL's host identity is in scope
    pub fn accepts_url(&self, url: &Url) -> bool {
        site_host(url).is_some_and(|host| self.accepts(&host))
    }

    /// Both accepted hosts, seed host first
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }
}
