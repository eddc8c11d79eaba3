use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Focus-Crawl
///
/// Every section is optional in the TOML file; missing keys take the
/// defaults documented on each field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub fetch: FetchConfig,
    pub focused: FocusedConfig,
    pub render: RenderConfig,
}

/// Crawl run parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// URL the crawl starts from (may also be given on the command line)
    pub seed_url: String,

    /// Maximum number of distinct pages a single run may visit
    pub max_pages: usize,

    /// Number of concurrent extraction workers
    pub workers: usize,

    /// Order in which discovered links are explored
    pub traversal: Traversal,

    /// Whether pages are rendered in a headless browser
    pub render_mode: RenderMode,

    /// Host patterns (e.g. "*.linkedin.com") that need script rendering
    pub rendered_domains: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: String::new(),
            max_pages: 20,
            workers: 4,
            traversal: Traversal::DepthFirst,
            render_mode: RenderMode::Auto,
            rendered_domains: vec!["*.linkedin.com".to_string(), "*.indiamart.com".to_string()],
        }
    }
}

/// Frontier traversal order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Traversal {
    /// Each discovered link is explored before its next sibling (LIFO)
    DepthFirst,
    /// Links are explored in discovery order (FIFO)
    BreadthFirst,
}

/// How the extraction strategy is chosen for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Render only when the seed host matches `rendered-domains`
    Auto,
    /// Always render pages in a headless browser
    Always,
    /// Never render; fetch static content only
    Never,
}

/// HTTP fetch configuration for static extraction
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Total request timeout in seconds
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Maximum redirect hops followed per request
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("focus-crawl/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_redirects: 10,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Limits for focused link discovery on statically fetched pages
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FocusedConfig {
    /// Soft cap on pages inspected while discovering links
    pub max_seen_links: usize,

    /// Hard cap on unique links accumulated per page
    pub max_known_links: usize,
}

impl Default for FocusedConfig {
    fn default() -> Self {
        Self {
            max_seen_links: 5,
            max_known_links: 50,
        }
    }
}

/// Headless browser configuration for rendered extraction
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RenderConfig {
    /// Time to let asynchronous scripts populate the page (milliseconds)
    pub settle_ms: u64,

    /// Upper bound for launching and rendering one page (seconds)
    pub timeout_secs: u64,

    /// Run the browser without a window
    pub headless: bool,

    /// Keep the browser sandbox enabled (ignored inside containers)
    pub sandbox: bool,

    /// Explicit Chrome/Chromium executable; auto-detected when absent
    pub chrome_executable: Option<String>,

    pub window_width: u32,

    pub window_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            settle_ms: 5000,
            timeout_secs: 60,
            headless: true,
            sandbox: true,
            chrome_executable: None,
            window_width: 1920,
            window_height: 1080,
        }
    }
}

impl RenderConfig {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
