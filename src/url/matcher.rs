use crate::config::HostMatch;

/// Checks if a candidate host belongs to the target host
///
/// Both arguments are expected to be lowercase with any leading `www.`
/// already removed.
///
/// * [`HostMatch::Substring`] accepts any candidate that contains the target
///   anywhere, so `shop.example.com` and `example.com.evil.net` both match
///   `example.com`.
/// * [`HostMatch::Suffix`] accepts the target itself or one of its
///   subdomains.
///
/// # Examples
///
/// ```
/// use product_discoverer::config::HostMatch;
/// use product_discoverer::url::host_matches;
///
/// assert!(host_matches(HostMatch::Substring, "example.com", "shop.example.com"));
/// assert!(host_matches(HostMatch::Substring, "example.com", "myexample.com"));
///
/// assert!(host_matches(HostMatch::Suffix, "example.com", "shop.example.com"));
/// assert!(!host_matches(HostMatch::Suffix, "example.com", "myexample.com"));
/// ```
pub fn host_matches(mode: HostMatch, target: &str, candidate: &str) -> bool {
    match mode {
        HostMatch::Substring => candidate.contains(target),
        HostMatch::Suffix => {
            candidate == target
                || candidate
                    .strip_suffix(target)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
    }
}
