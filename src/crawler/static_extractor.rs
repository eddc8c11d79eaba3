//! Static extraction: HTTP fetch without script execution

use crate::config::{FetchConfig, FocusedConfig};
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult};
use crate::crawler::focused::discover_links;
use crate::crawler::readability::extract_main_text;
use crate::crawler::types::{ExtractError, Extractor, PageResult};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

/// Fetches pages over HTTP and extracts their main text and focused links
///
/// Fetch failures (timeouts, DNS, non-success status, non-HTML content)
/// are not errors here: they yield an empty [`PageResult`].
pub struct StaticExtractor {
    client: Client,
    focused: FocusedConfig,
}

impl StaticExtractor {
    pub fn new(fetch: &FetchConfig, focused: FocusedConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(fetch)?,
            focused,
        })
    }
}

#[async_trait]
impl Extractor for StaticExtractor {
    async fn extract(&self, url: &Url) -> Result<PageResult, ExtractError> {
        let (final_url, body) = match fetch_url(&self.client, url.as_str()).await {
            FetchResult::Success {
                final_url, body, ..
            } => (final_url, body),
            failure => {
                tracing::warn!(
                    "Fetch failed for {}: {}",
                    url,
                    failure.failure_reason().unwrap_or_default()
                );
                return Ok(PageResult::empty());
            }
        };

        // Relative links resolve against where the redirects ended.
        let base = Url::parse(&final_url).unwrap_or_else(|_| url.clone());

        let text = extract_main_text(&body);
        let links = discover_links(&self.client, &base, &body, &self.focused).await;

        tracing::debug!(
            "Static extraction of {}: {} chars, {} links",
            url,
            text.as_ref().map_or(0, |t| t.len()),
            links.len()
        );

        Ok(PageResult::new(text, links))
    }
}
