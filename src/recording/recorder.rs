// src/recording/recorder.rs
//! Session recorder
//!
//! A [`Recorder`] accumulates records for one session key and flushes them
//! through its formatter to a [`Destination`]. Appending is cheap and never
//! fails; only the `save*` methods touch the file system.

use crate::formatter::{Formatter, OutputFormat};
use crate::recording::record::{Recordable, SharedRecord};
use crate::recording::storage::Destination;
use crate::utils::errors::Result;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Recorder statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecorderStats {
    pub records_added: u64,
    pub documents_written: u64,
    pub bytes_written: u64,
}

#[derive(Debug, Default)]
struct StatsCounters {
    records_added: AtomicU64,
    documents_written: AtomicU64,
    bytes_written: AtomicU64,
}

/// Accumulates the records of one session
pub struct Recorder {
    session_id: String,
    records: RwLock<Vec<SharedRecord>>,
    destination: Destination,
    formatter: Arc<dyn Formatter>,
    stats: StatsCounters,
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("session_id", &self.session_id)
            .field("records", &self.records.read().len())
            .field("destination", &self.destination)
            .field("format", &self.formatter.output_format())
            .finish()
    }
}

impl Recorder {
    /// Create a recorder with a fresh session id
    pub fn new(destination: Destination, formatter: Arc<dyn Formatter>) -> Self {
        Self::with_session_id(ulid::Ulid::new().to_string(), destination, formatter)
    }

    pub fn with_session_id(
        session_id: impl Into<String>,
        destination: Destination,
        formatter: Arc<dyn Formatter>,
    ) -> Self {
        let session_id = session_id.into();
        info!(
            "Creating {} recorder {} -> {}",
            formatter.output_format(),
            session_id,
            destination.path().display()
        );

        Self {
            session_id,
            records: RwLock::new(Vec::new()),
            destination,
            formatter,
            stats: StatsCounters::default(),
        }
    }

    /// Recorder for `format` writing to `destination`
    pub fn for_format(format: OutputFormat, destination: Destination) -> Self {
        Self::new(destination, format.formatter())
    }

    /// Append a record
    pub fn add_record(&self, record: impl Recordable + 'static) {
        self.add_shared(Arc::new(record));
    }

    /// Append an already shared record
    pub fn add_shared(&self, record: SharedRecord) {
        debug!(
            session_id = %self.session_id,
            "Adding record {}#{}",
            record.class_name(),
            record.method_name()
        );
        self.records.write().push(record);
        self.stats.records_added.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("reporter_records_added_total").increment(1);
    }

    /// Snapshot of the accumulated records, in insertion order
    pub fn records(&self) -> Vec<SharedRecord> {
        self.records.read().clone()
    }

    /// Render the accumulated records without writing them
    pub fn formatted_records(&self) -> Result<String> {
        let records = self.records();
        self.formatter.format_records(&records, &self.session_id)
    }

    pub fn clear_records(&self) {
        self.records.write().clear();
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn output_format(&self) -> OutputFormat {
        self.formatter.output_format()
    }

    /// Format and persist one record
    pub fn save_record(&self, record: &dyn Recordable) -> Result<PathBuf> {
        let document = self.formatter.format_record(record, &self.session_id)?;
        self.persist(&document)
    }

    /// Format and persist a list of records
    pub fn save_records(&self, records: &[SharedRecord]) -> Result<PathBuf> {
        let document = self.formatter.format_records(records, &self.session_id)?;
        self.persist(&document)
    }

    /// Format and persist everything accumulated so far
    pub fn save_all_records(&self) -> Result<PathBuf> {
        let records = self.records();
        info!(
            "Saving {} records of session {}",
            records.len(),
            self.session_id
        );
        self.save_records(&records)
    }

    /// Release held resources. Writes are one-shot so nothing stays open.
    pub fn close(&self) {
        debug!("Closing recorder {}", self.session_id);
    }

    pub fn stats(&self) -> RecorderStats {
        RecorderStats {
            records_added: self.stats.records_added.load(Ordering::Relaxed),
            documents_written: self.stats.documents_written.load(Ordering::Relaxed),
            bytes_written: self.stats.bytes_written.load(Ordering::Relaxed),
        }
    }

    fn persist(&self, document: &str) -> Result<PathBuf> {
        match self.destination.write(&self.session_id, document) {
            Ok(path) => {
                let bytes = document.len() as u64;
                self.stats.documents_written.fetch_add(1, Ordering::Relaxed);
                self.stats.bytes_written.fetch_add(bytes, Ordering::Relaxed);
                metrics::counter!(
                    "reporter_documents_written_total",
                    "format" => self.output_format().as_str()
                )
                .increment(1);
                metrics::counter!("reporter_bytes_written_total").increment(bytes);
                Ok(path)
            }
            Err(e) => {
                error!("Failed to save session {}: {}", self.session_id, e);
                Err(e)
            }
        }
    }
}
