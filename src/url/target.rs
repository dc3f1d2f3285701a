use crate::url::canonicalize::normalize_query;
use crate::url::domain::{host_key, strip_www};
use crate::{UrlError, UrlResult};
use url::{Host, Url};

/// A domain to crawl: its root URL and the identities derived from it
///
/// Built once per request and never mutated while the crawl runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    root_url: Url,
    root: String,
    host: String,
    identifier: String,
}

impl CrawlTarget {
    /// Parses a root URL into a crawl target
    ///
    /// The root is stored in the same canonical form discovered links take:
    /// query keys sorted, blank parameters dropped, one trailing `/` removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use product_discoverer::url::CrawlTarget;
    ///
    /// let target = CrawlTarget::new("https://www.example.com/").unwrap();
    /// assert_eq!(target.root(), "https://www.example.com");
    /// assert_eq!(target.host(), "example.com");
    /// assert_eq!(target.identifier(), "example");
    /// ```
    pub fn new(root: &str) -> UrlResult<Self> {
        let mut root_url = Url::parse(root.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

        if root_url.scheme() != "http" && root_url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(root_url.scheme().to_string()));
        }

        let host = host_key(&root_url).ok_or(UrlError::MissingDomain)?;
        let host = strip_www(&host).to_string();

        if root_url.query().is_some() {
            let query = normalize_query(&root_url);
            root_url.set_query(if query.is_empty() { None } else { Some(query.as_str()) });
        }

        let serialized = root_url.as_str();
        let root = serialized
            .strip_suffix('/')
            .unwrap_or(serialized)
            .to_string();
        let identifier = output_identifier(&root);

        Ok(Self {
            root_url,
            root,
            host,
            identifier,
        })
    }

    /// Canonical form of the root URL, the first record of every result file
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Parsed root URL
    pub fn root_url(&self) -> &Url {
        &self.root_url
    }

    /// Lowercase host (with explicit port) without a leading `www.`
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Name of the result file, without the `.txt` extension
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// Derives the result file identifier for a domain string
///
/// Protocol prefixes are removed, the remainder is split on `.`, and the
/// second piece is used. With fewer than two pieces the whole stripped string
/// is used instead.
///
/// # Examples
///
/// ```
/// use product_discoverer::url::output_identifier;
///
/// assert_eq!(output_identifier("https://www.example.co.uk"), "example");
/// assert_eq!(output_identifier("example.com"), "com");
/// assert_eq!(output_identifier("http://localhost"), "localhost");
/// ```
pub fn output_identifier(domain: &str) -> String {
    let stripped = domain.replace("https://", "").replace("http://", "");
    match stripped.split('.').nth(1) {
        Some(label) => label.to_string(),
        None => stripped,
    }
}

/// Adds a scheme and a `www.` host prefix to a user-supplied domain
///
/// Domains without a scheme get `https://`. Hosts that do not already start
/// with `www.` get it prepended, except IP literals which cannot carry one.
///
/// # Examples
///
/// ```
/// use product_discoverer::url::normalize_domain;
///
/// assert_eq!(normalize_domain("example.com").unwrap(), "https://www.example.com");
/// assert_eq!(normalize_domain("http://shop.example.com/").unwrap(), "http://www.shop.example.com");
/// assert_eq!(normalize_domain("https://www.example.com").unwrap(), "https://www.example.com");
/// ```
pub fn normalize_domain(raw: &str) -> UrlResult<String> {
    let raw = raw.trim();
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let mut url = Url::parse(&with_scheme).map_err(|e| UrlError::Parse(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let prefixed = match url.host() {
        Some(Host::Domain(domain)) if !domain.starts_with("www.") => {
            Some(format!("www.{}", domain))
        }
        Some(_) => None,
        None => return Err(UrlError::MissingDomain),
    };
    if let Some(host) = prefixed {
        url.set_host(Some(&host))
            .map_err(|e| UrlError::Parse(e.to_string()))?;
    }

    let serialized = url.as_str();
    Ok(serialized.strip_suffix('/').unwrap_or(serialized).to_string())
}
