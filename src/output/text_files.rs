//! Plain-text document output
//!
//! Each record becomes one `.txt` file, the layout the downstream ingestion
//! stage loads documents from.

use crate::crawler::ExtractedRecord;
use crate::output::traits::{OutputResult, RecordSink};
use std::fs;
use std::path::PathBuf;

/// Longest slug kept in a file name
const MAX_SLUG_LEN: usize = 80;

/// Writes every record to `<dir>/NNNN_<slug>.txt`
///
/// `NNNN` is the 1-based emission index, so a directory listing follows
/// emission order.
#[derive(Debug)]
pub struct TextFileWriter {
    dir: PathBuf,
    written: usize,
}

impl TextFileWriter {
    /// Creates the output directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> OutputResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, written: 0 })
    }

    /// Number of files written so far
    pub fn written(&self) -> usize {
        self.written
    }
}

impl RecordSink for TextFileWriter {
    fn write_record(&mut self, record: &ExtractedRecord) -> OutputResult<()> {
        let name = format!("{:04}_{}.txt", self.written + 1, slug_for(&record.id));
        let path = self.dir.join(name);

        fs::write(&path, &record.text)?;
        self.written += 1;

        tracing::debug!("Wrote {} to {}", record.id, path.display());
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        tracing::info!(
            "Wrote {} documents to {}",
            self.written,
            self.dir.display()
        );
        Ok(())
    }
}

/// Turns a URL into a file-name-safe slug
///
/// The scheme is dropped and every run of characters other than ASCII
/// letters and digits becomes a single `_`.
fn slug_for(id: &str) -> String {
    let without_scheme = id.split_once("://").map_or(id, |(_, rest)| rest);

    let mut slug = String::with_capacity(without_scheme.len());
    for c in without_scheme.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }

    let slug = slug.trim_matches('_');
    let slug: String = slug.chars().take(MAX_SLUG_LEN).collect();
    let slug = slug.trim_end_matches('_');

    if slug.is_empty() {
        "page".to_string()
    } else {
        slug.to_string()
    }
}
