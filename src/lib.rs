//! Focus-Crawl: a budgeted, focused web crawler
//!
//! This crate visits pages reachable from a seed URL, extracts their readable
//! text and outbound links, and streams `(url, text)` records to a downstream
//! consumer. The total number of visited pages is bounded by a fixed budget and
//! no URL is ever visited twice.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Focus-Crawl operations
///
/// Only conditions that abort a whole run live here. Per-page failures are
/// [`crawler::ExtractError`]s and are recovered by the coordinator.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL '{url}': {source}")]
    InvalidSeed { url: String, source: UrlError },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
///
/// A link that fails to resolve is dropped and never enters the frontier.
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Link does not point to a navigable page: {0}")]
    NotNavigable(String),
}

/// Result type alias for Focus-Crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlStats, ExtractedRecord, PageResult, Strategy};
pub use url::{parse_seed, resolve_link};
