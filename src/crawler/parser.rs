//! Anchor link extraction
//!
//! Every `<a href>` in a document is resolved against the page URL with the
//! link resolver. Targets that fail to resolve are dropped; they never reach
//! the frontier.

use crate::url::resolve_link;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href]").expect("BUG: hardcoded CSS selector 'a[href]' is invalid")
});

/// Extracts every resolvable anchor target from a parsed document
///
/// Links keep document order; repeated targets are reported once.
pub fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        match resolve_link(base_url, href) {
            Ok(url) => {
                if seen.insert(url.as_str().to_string()) {
                    links.push(url);
                }
            }
            Err(e) => tracing::debug!("Dropping link {:?} on {}: {}", href, base_url, e),
        }
    }

    links
}

/// Convenience function for extracting links from raw HTML
///
/// # Example
///
/// ```
/// use focus_crawl::crawler::extract_links_from_html;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let links = extract_links_from_html(html, &base);
/// assert_eq!(links[0].as_str(), "https://example.com/page");
/// ```
pub fn extract_links_from_html(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    extract_links(&document, base_url)
}
