use crate::config::{FilterConfig, HostMatch};
use crate::url::domain::{host_key, strip_www};
use crate::url::matcher::host_matches;
use crate::url::target::CrawlTarget;
use crate::ConfigError;
use regex::Regex;
use std::collections::BTreeMap;
use thiserror::Error;
use url::form_urlencoded;
use url::Url;

/// Why a hyperlink was not accepted into the frontier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("script pseudo-protocol link")]
    ScriptLink,

    #[error("cannot resolve against base URL: {0}")]
    Unresolvable(String),

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("host {0} is outside the target domain")]
    OffDomain(String),

    #[error("non-content file extension")]
    NonContentExtension,

    #[error("URL carries a fragment")]
    Fragment,

    #[error("path matches the exclusion vocabulary")]
    ExcludedPath,
}

/// Turns raw hyperlinks into canonical same-domain URLs
///
/// A canonicalizer is bound to one [`CrawlTarget`]; it holds no mutable
/// state, so the same `(href, base)` pair always yields the same verdict.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    target_host: String,
    host_match: HostMatch,
    extensions: Vec<String>,
    exclusions: Option<Regex>,
}

impl Canonicalizer {
    /// Builds a canonicalizer for `target` using the configured filters
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the exclusion vocabulary
    /// does not compile into a regular expression.
    pub fn new(
        target: &CrawlTarget,
        host_match: HostMatch,
        filter: &FilterConfig,
    ) -> Result<Self, ConfigError> {
        let exclusions = if filter.excluded_words.is_empty() {
            None
        } else {
            let alternatives = filter
                .excluded_words
                .iter()
                .map(|word| regex::escape(word.trim()))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!("(?i){}", alternatives);
            Some(Regex::new(&pattern).map_err(|e| ConfigError::InvalidPattern(e.to_string()))?)
        };

        Ok(Self {
            target_host: target.host().to_string(),
            host_match,
            extensions: filter
                .excluded_extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
            exclusions,
        })
    }

    /// Canonicalizes `href` as found on the page at `base`
    ///
    /// # Steps
    ///
    /// 1. Reject `javascript:` links (case-insensitive)
    /// 2. Resolve against `base`
    /// 3. Strip a single trailing `:`
    /// 4. Reject schemes other than http/https
    /// 5. Reject hosts outside the target domain
    /// 6. Reject non-content extensions
    /// 7. Reject URLs containing `#`
    /// 8. Reject paths matching the exclusion vocabulary
    /// 9. Sort and re-encode the query string
    /// 10. Strip a single trailing slash
    ///
    /// # Examples
    ///
    /// ```
    /// use product_discoverer::config::{FilterConfig, HostMatch};
    /// use product_discoverer::url::{Canonicalizer, CrawlTarget};
    ///
    /// let target = CrawlTarget::new("https://www.example.com").unwrap();
    /// let canon = Canonicalizer::new(&target, HostMatch::Substring, &FilterConfig::default()).unwrap();
    ///
    /// let url = canon.canonicalize("/products/42/?b=2&a=1", target.root_url()).unwrap();
    /// assert_eq!(url, "https://www.example.com/products/42/?a=1&b=2");
    /// ```
    pub fn canonicalize(&self, href: &str, base: &Url) -> Result<String, Rejection> {
        let href = href.trim();

        if href
            .get(..11)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("javascript:"))
        {
            return Err(Rejection::ScriptLink);
        }

        let resolved = base
            .join(href)
            .map_err(|e| Rejection::Unresolvable(e.to_string()))?;
        let mut url = strip_trailing_colon(resolved)?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Rejection::UnsupportedScheme(url.scheme().to_string()));
        }

        let host = host_key(&url).ok_or_else(|| Rejection::OffDomain(String::new()))?;
        if !host_matches(self.host_match, &self.target_host, strip_www(&host)) {
            return Err(Rejection::OffDomain(host));
        }

        let path = url.path().to_lowercase();
        if self.extensions.iter().any(|ext| path.ends_with(ext.as_str())) {
            return Err(Rejection::NonContentExtension);
        }

        if url.as_str().contains('#') {
            return Err(Rejection::Fragment);
        }

        if let Some(exclusions) = &self.exclusions {
            if exclusions.is_match(url.path()) {
                return Err(Rejection::ExcludedPath);
            }
        }

        if url.query().is_some() {
            let query = normalize_query(&url);
            url.set_query(if query.is_empty() { None } else { Some(query.as_str()) });
        }

        let serialized = url.as_str();
        Ok(serialized
            .strip_suffix('/')
            .unwrap_or(serialized)
            .to_string())
    }
}

/// Drops a single `:` left dangling at the end of a resolved URL
fn strip_trailing_colon(url: Url) -> Result<Url, Rejection> {
    match url.as_str().strip_suffix(':') {
        Some(trimmed) => Url::parse(trimmed).map_err(|e| Rejection::Unresolvable(e.to_string())),
        None => Ok(url),
    }
}

/// Re-serializes the query with sorted keys and repeated keys for lists
///
/// Parameters with blank values are dropped; values of a repeated key keep
/// their original relative order.
pub(crate) fn normalize_query(url: &Url) -> String {
    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in url.query_pairs() {
        if value.is_empty() {
            continue;
        }
        params
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, values) in &params {
        for value in values {
            serializer.append_pair(key, value);
        }
    }
    serializer.finish()
}
