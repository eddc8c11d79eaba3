//! Record previews in the log

use crate::crawler::ExtractedRecord;
use crate::output::traits::{OutputResult, RecordSink};

/// Characters of text shown per record
pub const PREVIEW_CHARS: usize = 500;

/// Logs the start of every record's text at info level
#[derive(Debug, Default)]
pub struct PreviewLogger;

impl RecordSink for PreviewLogger {
    fn write_record(&mut self, record: &ExtractedRecord) -> OutputResult<()> {
        tracing::info!(
            "Extracted {} ({} chars):\n{}",
            record.id,
            record.text.chars().count(),
            preview(&record.text)
        );
        Ok(())
    }
}

/// Returns at most the first [`PREVIEW_CHARS`] characters of `text`
pub fn preview(text: &str) -> &str {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
