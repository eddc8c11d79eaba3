//! Crawler module for page extraction and traversal
//!
//! This module contains the core crawling logic, including:
//! - Frontier and visited-set management
//! - Per-run extraction strategy selection
//! - Static extraction (HTTP fetch, readable text, focused link discovery)
//! - Rendered extraction in a headless browser
//! - Overall crawl coordination across a worker pool

mod coordinator;
mod fetcher;
mod focused;
mod frontier;
mod parser;
mod readability;
mod rendered;
mod selector;
mod static_extractor;
mod types;

pub use coordinator::{Coordinator, CrawlStats};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use focused::discover_links;
pub use frontier::{Frontier, VisitedSet};
pub use parser::{extract_links, extract_links_from_html};
pub use readability::{extract_main_text, extract_visible_text};
pub use rendered::{page_from_markup, RenderedExtractor};
pub use selector::{select, strategy_for_run};
pub use static_extractor::StaticExtractor;
pub use types::{ExtractError, ExtractedRecord, Extractor, PageResult, Strategy};

use crate::config::Config;
use crate::CrawlError;
use tokio::sync::mpsc;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Resolve the seed URL and pick the extraction strategy
/// 2. Build the extractor for that strategy
/// 3. Visit pages until the budget is spent or nothing is left
/// 4. Send every page with text to `sink`
///
/// # Returns
///
/// * `Ok(CrawlStats)` - The crawl ran to completion
/// * `Err(CrawlError)` - The crawl could not start
///
/// # Example
///
/// ```no_run
/// use focus_crawl::config::load_config;
/// use focus_crawl::crawler::{crawl, ExtractedRecord};
/// use std::path::Path;
/// use tokio::sync::mpsc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("crawl.toml"))?;
/// let (tx, mut rx) = mpsc::channel::<ExtractedRecord>(16);
/// let consumer = tokio::spawn(async move {
///     while let Some(record) = rx.recv().await {
///         println!("{}: {} chars", record.id, record.text.len());
///     }
/// });
/// crawl(config, tx).await?;
/// consumer.await?;
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    config: Config,
    sink: mpsc::Sender<ExtractedRecord>,
) -> Result<CrawlStats, CrawlError> {
    Coordinator::new(config)?.run(sink).await
}
