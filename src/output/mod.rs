//! Output module for consuming crawl records and reporting runs
//!
//! This module handles:
//! - Writing records as plain-text documents for downstream ingestion
//! - Logging a preview of every record
//! - Printing run statistics

mod preview;
pub mod stats;
mod text_files;
mod traits;

pub use preview::{preview, PreviewLogger, PREVIEW_CHARS};
pub use stats::{print_statistics, yield_rate};
pub use text_files::TextFileWriter;
pub use traits::{OutputError, OutputResult, RecordSink};

use crate::crawler::ExtractedRecord;
use tokio::sync::mpsc;

/// Feeds every record from `records` to each sink, in order
///
/// Stops at the first sink error; dropping the receiver then ends the crawl
/// early.
///
/// # Returns
///
/// * `Ok(usize)` - Number of records consumed
/// * `Err(OutputError)` - A sink failed
pub async fn consume_records(
    mut records: mpsc::Receiver<ExtractedRecord>,
    mut sinks: Vec<Box<dyn RecordSink>>,
) -> OutputResult<usize> {
    let mut consumed = 0;

    while let Some(record) = records.recv().await {
        for sink in sinks.iter_mut() {
            sink.write_record(&record)?;
        }
        consumed += 1;
    }

    for sink in sinks.iter_mut() {
        sink.finish()?;
    }

    Ok(consumed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recording(Arc<Mutex<Vec<String>>>);

    impl RecordSink for Recording {
        fn write_record(&mut self, record: &ExtractedRecord) -> OutputResult<()> {
            self.0.lock().unwrap().push(record.id.clone());
            Ok(())
        }
    }

    struct Failing;

    impl RecordSink for Failing {
        fn write_record(&mut self, _record: &ExtractedRecord) -> OutputResult<()> {
            Err(OutputError::Write("disk full".to_string()))
        }
    }

    fn record(id: &str) -> ExtractedRecord {
        ExtractedRecord {
            id: id.to_string(),
            text: "text".to_string(),
        }
    }

    #[tokio::test]
    async fn test_consume_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (tx, rx) = mpsc::channel(4);

        tx.send(record("a")).await.unwrap();
        tx.send(record("b")).await.unwrap();
        drop(tx);

        let sinks: Vec<Box<dyn RecordSink>> = vec![Box::new(Recording(Arc::clone(&seen)))];
        let consumed = consume_records(rx, sinks).await.unwrap();

        assert_eq!(consumed, 2);
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_sink_failure_stops_consumption() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(record("a")).await.unwrap();
        drop(tx);

        let sinks: Vec<Box<dyn RecordSink>> = vec![Box::new(Failing)];
        let result = consume_records(rx, sinks).await;
        assert!(matches!(result, Err(OutputError::Write(_))));
    }
}
