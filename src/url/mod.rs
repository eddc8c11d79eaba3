//! URL handling module for Focus-Crawl
//!
//! This module provides the link resolver (anchor target → absolute URL),
//! seed parsing, and host extraction and matching.

mod host;
mod resolve;

pub use host::{extract_host, matches_host_pattern, same_host};
pub use resolve::{parse_seed, resolve_link};
