//! Rendered extraction through a headless browser
//!
//! Every page gets a fresh browser process with its own throwaway profile,
//! so no cookies, storage or open tabs leak from one page to the next. The
//! process lives inside a [`RenderSession`] that is torn down on every exit
//! path: explicit close on success or failure, and kill-on-drop if the
//! extraction future is abandoned by a timeout.

use crate::config::RenderConfig;
use crate::crawler::parser::extract_links;
use crate::crawler::readability::extract_visible_text;
use crate::crawler::types::{ExtractError, Extractor, PageResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use scraper::Html;
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tokio::time::{timeout, timeout_at, Instant};
use url::Url;

/// How long a graceful browser shutdown may take before it is killed
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Renders each page in a fresh headless browser and reads the final DOM
pub struct RenderedExtractor {
    config: RenderConfig,
}

impl RenderedExtractor {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Extractor for RenderedExtractor {
    async fn extract(&self, url: &Url) -> Result<PageResult, ExtractError> {
        let deadline = Instant::now() + self.config.timeout();
        let render_failure = |reason: String| ExtractError::Render {
            url: url.to_string(),
            reason,
        };
        let timed_out = || ExtractError::Timeout {
            url: url.to_string(),
        };

        let mut session = match timeout_at(deadline, RenderSession::launch(&self.config)).await {
            Ok(Ok(session)) => session,
            Ok(Err(reason)) => return Err(render_failure(reason)),
            Err(_) => return Err(timed_out()),
        };

        let rendered = timeout_at(deadline, session.render(url, self.config.settle())).await;
        session.shutdown().await;
        drop(session);

        let (markup, final_url) = match rendered {
            Ok(Ok(output)) => output,
            Ok(Err(reason)) => return Err(render_failure(reason)),
            Err(_) => return Err(timed_out()),
        };

        let base = final_url.unwrap_or_else(|| url.clone());
        let result = page_from_markup(&base, &markup);

        tracing::debug!(
            "Rendered extraction of {}: {} chars, {} links",
            url,
            result.text.as_ref().map_or(0, |t| t.len()),
            result.links.len()
        );

        Ok(result)
    }
}

/// Builds a page result from fully rendered markup
///
/// All visible text is kept and every anchor with a resolvable target is
/// reported, resolved against `base`.
pub fn page_from_markup(base: &Url, markup: &str) -> PageResult {
    let document = Html::parse_document(markup);
    let text = extract_visible_text(&document);
    let links = extract_links(&document, base);
    PageResult::new(text, links)
}

/// A browser process scoped to the rendering of a single page
struct RenderSession {
    browser: Browser,
    handler: JoinHandle<()>,
    _profile: TempDir,
}

impl RenderSession {
    async fn launch(config: &RenderConfig) -> Result<Self, String> {
        let profile = tempfile::Builder::new()
            .prefix("focus-crawl-chrome-")
            .tempdir()
            .map_err(|e| format!("Failed to create browser profile: {}", e))?;

        let mut builder = BrowserConfig::builder()
            .request_timeout(config.timeout())
            .window_size(config.window_width, config.window_height)
            .user_data_dir(profile.path())
            .arg("--disable-gpu")
            .arg("--disable-extensions")
            .arg("--disable-notifications")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--mute-audio");

        if let Some(executable) = &config.chrome_executable {
            builder = builder.chrome_executable(executable);
        }

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox || running_in_container() {
            tracing::debug!("Launching browser without sandbox");
            builder = builder.no_sandbox();
        }

        let browser_config = builder
            .build()
            .map_err(|e| format!("Failed to build browser config: {}", e))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| format!("Failed to launch browser: {}", e))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("Browser handler event error: {}", e);
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            _profile: profile,
        })
    }

    /// Navigates to `url`, waits for the page to settle and returns its markup
    /// together with the final page URL
    async fn render(&self, url: &Url, settle: Duration) -> Result<(String, Option<Url>), String> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| format!("Failed to open page: {}", e))?;

        page.goto(url.as_str())
            .await
            .map_err(|e| format!("Navigation failed: {}", e))?;

        tokio::time::sleep(settle).await;

        let markup = page
            .content()
            .await
            .map_err(|e| format!("Failed to read rendered content: {}", e))?;

        let final_url = page
            .url()
            .await
            .ok()
            .flatten()
            .and_then(|u| Url::parse(&u).ok());

        Ok((markup, final_url))
    }

    /// Closes the browser and waits for the process to exit
    async fn shutdown(&mut self) {
        let closed = timeout(SHUTDOWN_GRACE, async {
            if let Err(e) = self.browser.close().await {
                tracing::debug!("Browser close failed: {}", e);
            }
            if let Err(e) = self.browser.wait().await {
                tracing::debug!("Waiting for browser exit failed: {}", e);
            }
        })
        .await;

        if closed.is_err() {
            tracing::warn!("Browser did not exit within {:?}; killing it", SHUTDOWN_GRACE);
        }
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        // Dropping `Browser` kills the child process if it is still running.
        self.handler.abort();
    }
}

/// Setuid sandboxes do not work inside containers
fn running_in_container() -> bool {
    std::path::Path::new("/.dockerenv").exists()
        || std::env::var("container").is_ok()
        || std::env::var("KUBERNETES_SERVICE_HOST").is_ok()
}
