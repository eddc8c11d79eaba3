use crate::UrlError;
use url::Url;

/// Schemes that never lead to a crawlable document
const NON_NAVIGABLE_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Resolves an anchor target against the page it was found on
///
/// The identity of the returned URL is its serialized form as produced by
/// the `url` crate: scheme and host are lowercased, dot segments removed and
/// default ports dropped. Trailing slashes and fragments are left untouched.
///
/// # Rejected targets
///
/// - empty targets and fragment-only targets (`#section`)
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - anything that does not resolve to an `http`/`https` URL with a host
///
/// # Examples
///
/// ```
/// use focus_crawl::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://a.com/x/y").unwrap();
/// assert_eq!(resolve_link(&base, "../z").unwrap().as_str(), "https://a.com/z");
/// assert_eq!(
///     resolve_link(&base, "https://b.org/page").unwrap().as_str(),
///     "https://b.org/page"
/// );
/// ```
pub fn resolve_link(base: &Url, href: &str) -> Result<Url, UrlError> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return Err(UrlError::NotNavigable(href.to_string()));
    }

    let lowered = href.to_ascii_lowercase();
    if NON_NAVIGABLE_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
    {
        return Err(UrlError::NotNavigable(href.to_string()));
    }

    let resolved = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    check_crawlable(resolved)
}

/// Parses the seed URL of a crawl run
///
/// The seed must be an absolute `http` or `https` URL with a host.
pub fn parse_seed(seed: &str) -> Result<Url, UrlError> {
    let url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    check_crawlable(url)
}

fn check_crawlable(url: Url) -> Result<Url, UrlError> {
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::UnsupportedScheme(other.to_string())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingHost),
    }
}
