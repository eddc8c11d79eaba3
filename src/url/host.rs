use url::Url;

/// Returns the lowercase host of a URL, without a trailing root dot
///
/// # Examples
///
/// ```
/// use url::Url;
/// use focus_crawl::url::extract_host;
///
/// let url = Url::parse("https://WWW.LinkedIn.com./in/someone").unwrap();
/// assert_eq!(extract_host(&url), Some("www.linkedin.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str()
        .map(|h| h.trim_end_matches('.').to_lowercase())
        .filter(|h| !h.is_empty())
}

/// Checks whether a host matches a pattern
///
/// `"example.com"` matches only that host; `"*.example.com"` matches the bare
/// domain and any subdomain of it. The host is compared case-insensitively.
pub fn matches_host_pattern(pattern: &str, host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();

    match pattern.strip_prefix("*.") {
        Some(base) => {
            host == base
                || host
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => host == pattern,
    }
}

/// Returns true when both URLs live on the same host
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (extract_host(a), extract_host(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
