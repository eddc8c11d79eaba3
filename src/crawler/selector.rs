//! Extraction strategy selection
//!
//! The strategy is decided once per run from the seed URL and applied to
//! every page of that run.

use crate::config::{CrawlerConfig, RenderMode};
use crate::crawler::types::Strategy;
use crate::url::{extract_host, matches_host_pattern};
use url::Url;

/// Chooses the extraction strategy from the seed's host
///
/// Returns `Rendered` iff the seed host matches one of the script-heavy
/// domain patterns, `Static` otherwise.
///
/// # Examples
///
/// ```
/// use focus_crawl::crawler::{select, Strategy};
/// use url::Url;
///
/// let patterns = vec!["*.linkedin.com".to_string()];
/// let seed = Url::parse("https://www.linkedin.com/company/acme").unwrap();
/// assert_eq!(select(&seed, &patterns), Strategy::Rendered);
///
/// let seed = Url::parse("https://example.org/").unwrap();
/// assert_eq!(select(&seed, &patterns), Strategy::Static);
/// ```
pub fn select(seed: &Url, rendered_domains: &[String]) -> Strategy {
    let Some(host) = extract_host(seed) else {
        return Strategy::Static;
    };

    if rendered_domains
        .iter()
        .any(|pattern| matches_host_pattern(pattern, &host))
    {
        Strategy::Rendered
    } else {
        Strategy::Static
    }
}

/// Applies the configured render mode on top of the host heuristic
pub fn strategy_for_run(seed: &Url, config: &CrawlerConfig) -> Strategy {
    match config.render_mode {
        RenderMode::Always => Strategy::Rendered,
        RenderMode::Never => Strategy::Static,
        RenderMode::Auto => select(seed, &config.rendered_domains),
    }
}
