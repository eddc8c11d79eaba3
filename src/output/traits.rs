//! Record sink trait and output errors
//!
//! A sink receives every record a crawl emits, in emission order, and is
//! finalized once the crawl is over.

use crate::crawler::ExtractedRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Consumer of extracted records
pub trait RecordSink: Send {
    /// Handles one emitted record
    fn write_record(&mut self, record: &ExtractedRecord) -> OutputResult<()>;

    /// Flushes anything buffered once no more records will arrive
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}
