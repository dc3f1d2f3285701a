use url::Url;

/// Extracts the host of a URL together with its explicit port
///
/// The `url` crate lowercases hosts and drops default ports while parsing, so
/// `https://Example.COM:443/` yields `example.com` while
/// `http://127.0.0.1:8080/` yields `127.0.0.1:8080`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use product_discoverer::url::host_key;
///
/// let url = Url::parse("https://www.example.com/path").unwrap();
/// assert_eq!(host_key(&url), Some("www.example.com".to_string()));
///
/// let url = Url::parse("http://localhost:3000/").unwrap();
/// assert_eq!(host_key(&url), Some("localhost:3000".to_string()));
/// ```
pub fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Removes a single leading `www.` label
pub fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}
