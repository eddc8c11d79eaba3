//! Focused link discovery for statically fetched pages
//!
//! Starting at a page, a small same-site crawl collects the links worth
//! following. Two independent limits bound it:
//! - `max_seen_links`: pages inspected (the start page counts first)
//! - `max_known_links`: unique links accumulated
//!
//! Pages fetched here are only read for links; they are not claimed and
//! produce no records.

use crate::config::FocusedConfig;
use crate::crawler::fetcher::fetch_url;
use crate::crawler::parser::extract_links_from_html;
use crate::url::same_host;
use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Path extensions that never lead to an HTML page
const ASSET_EXTENSIONS: &[&str] = &[
    "7z", "avi", "bmp", "css", "csv", "doc", "docx", "eot", "exe", "gif", "gz", "ico", "jpeg",
    "jpg", "js", "json", "mov", "mp3", "mp4", "pdf", "png", "ppt", "pptx", "rar", "rss", "svg",
    "tar", "tgz", "ttf", "txt", "wav", "webm", "webp", "woff", "woff2", "xls", "xlsx", "xml",
    "zip",
];

/// Discovers the outbound links of `start`
///
/// `start_body` is the already-fetched HTML of `start` and counts as the
/// first inspected page. Further pages are fetched from the discovered
/// same-host links in discovery order until either limit is reached. A
/// failed fetch still counts as an inspected page.
///
/// # Returns
///
/// The unique same-host page links found, in discovery order, excluding
/// `start` itself.
pub async fn discover_links(
    client: &Client,
    start: &Url,
    start_body: &str,
    limits: &FocusedConfig,
) -> Vec<Url> {
    let mut known: HashSet<String> = HashSet::from([start.as_str().to_string()]);
    let mut discovered: Vec<Url> = Vec::new();
    let mut to_visit: VecDeque<Url> = VecDeque::new();
    let mut seen = 0;

    let mut next_page = Some((start.clone(), Some(start_body.to_string())));

    while let Some((page_url, body)) = next_page.take() {
        seen += 1;

        let body = match body {
            Some(body) => Some(body),
            None => {
                let result = fetch_url(client, page_url.as_str()).await;
                if let Some(reason) = result.failure_reason() {
                    tracing::debug!("Focused discovery skipped {}: {}", page_url, reason);
                }
                result.into_body()
            }
        };

        if let Some(body) = body {
            for link in extract_links_from_html(&body, &page_url) {
                if discovered.len() >= limits.max_known_links {
                    break;
                }
                if !same_host(&link, start) || !looks_like_page(&link) {
                    continue;
                }
                if known.insert(link.as_str().to_string()) {
                    discovered.push(link.clone());
                    to_visit.push_back(link);
                }
            }
        }

        if seen >= limits.max_seen_links || discovered.len() >= limits.max_known_links {
            break;
        }

        next_page = to_visit.pop_front().map(|url| (url, None));
    }

    tracing::debug!(
        "Focused discovery on {}: {} pages inspected, {} links known",
        start,
        seen,
        discovered.len()
    );

    discovered
}

/// Rejects links whose path ends in a known non-HTML file extension
fn looks_like_page(url: &Url) -> bool {
    let path = url.path();
    let last_segment = path.rsplit('/').next().unwrap_or("");

    match last_segment.rsplit_once('.') {
        Some((_, extension)) => {
            let extension = extension.to_ascii_lowercase();
            !ASSET_EXTENSIONS.contains(&extension.as_str())
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;
    use crate::crawler::fetcher::build_http_client;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> Client {
        build_http_client(&FetchConfig::default()).unwrap()
    }

    fn start() -> Url {
        Url::parse("https://site.test/index").unwrap()
    }

    fn limits(max_seen_links: usize, max_known_links: usize) -> FocusedConfig {
        FocusedConfig {
            max_seen_links,
            max_known_links,
        }
    }

    #[test]
    fn test_looks_like_page() {
        let page = |s: &str| looks_like_page(&Url::parse(s).unwrap());
        assert!(page("https://a.com/"));
        assert!(page("https://a.com/about"));
        assert!(page("https://a.com/index.html"));
        assert!(page("https://a.com/index.php?title=Main"));
        assert!(!page("https://a.com/logo.PNG"));
        assert!(!page("https://a.com/files/report.pdf"));
        assert!(!page("https://a.com/static/app.js"));
    }

    #[tokio::test]
    async fn test_single_page_keeps_same_host_links() {
        let body = r#"
            <a href="/a">A</a>
            <a href="https://elsewhere.test/x">External</a>
            <a href="/index">Self</a>
            <a href="/b">B</a>
            <a href="/img/photo.jpg">Photo</a>
        "#;
        let links = discover_links(&client(), &start(), body, &limits(1, 50)).await;
        let links: Vec<&str> = links.iter().map(Url::as_str).collect();
        assert_eq!(links, vec!["https://site.test/a", "https://site.test/b"]);
    }

    #[tokio::test]
    async fn test_known_links_hard_cap() {
        let body: String = (0..20)
            .map(|i| format!(r#"<a href="/p{}">p{}</a>"#, i, i))
            .collect();
        let links = discover_links(&client(), &start(), &body, &limits(1, 7)).await;
        assert_eq!(links.len(), 7);
        assert_eq!(links[0].as_str(), "https://site.test/p0");
        assert_eq!(links[6].as_str(), "https://site.test/p6");
    }

    #[tokio::test]
    async fn test_page_without_links() {
        let links = discover_links(&client(), &start(), "<p>No links</p>", &limits(5, 50)).await;
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_follows_links_until_seen_limit() {
        let mock_server = MockServer::start().await;
        let base_url = mock_server.uri();

        Mock::given(method("GET"))
            .and(path("/a"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"<a href="/a1">A1</a><a href="/a2">A2</a><a href="/b">B</a>"#,
                "text/html",
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/b"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"<a href="/b1">B1</a>"#,
                "text/html",
            ))
            .expect(0)
            .mount(&mock_server)
            .await;

        let start = Url::parse(&format!("{}/", base_url)).unwrap();
        let body = r#"<a href="/a">A</a><a href="/b">B</a>"#;
        let links = discover_links(&client(), &start, body, &limits(2, 50)).await;

        let links: Vec<String> = links.iter().map(Url::to_string).collect();
        let expected: Vec<String> = ["/a", "/b", "/a1", "/a2"]
            .iter()
            .map(|p| format!("{}{}", base_url, p))
            .collect();
        assert_eq!(links, expected);
    }
}
