//! Shared crawler data types and the extractor seam

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Outcome of extracting a single page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    /// Readable text; `None` when extraction produced nothing
    pub text: Option<String>,

    /// Outbound links, in discovery order
    pub links: Vec<Url>,
}

impl PageResult {
    /// A result carrying no text and no links
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a result, treating blank text as absent
    pub fn new(text: Option<String>, links: Vec<Url>) -> Self {
        Self {
            text: text.filter(|t| !t.trim().is_empty()),
            links,
        }
    }
}

/// A unit of extracted text handed to the downstream pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecord {
    /// Serialized form of the visited URL
    pub id: String,

    /// Non-empty readable text of the page
    pub text: String,
}

/// Per-page extraction failures
///
/// None of these abort a crawl; the coordinator treats them as an empty page.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Render failed for {url}: {reason}")]
    Render { url: String, reason: String },

    #[error("Extraction of {url} timed out")]
    Timeout { url: String },
}

/// Extraction strategy chosen for a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Plain HTTP fetch, no script execution
    Static,
    /// Full render in a headless browser
    Rendered,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Rendered => write!(f, "rendered"),
        }
    }
}

/// Extracts text and outbound links from one page
///
/// Implementations must bound their own work by a timeout and must not keep
/// any per-page resource alive after `extract` returns.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, url: &Url) -> Result<PageResult, ExtractError>;
}
