// src/formatter/json.rs
//! JSON report formatter
//!
//! ```text
//! {
//!   "recorderUUID": "...",
//!   "records": [ { "className": "...", "context": "...", ... } ]
//! }
//! ```
//!
//! Every property value is written as a string. Absent values become the
//! string `"null"`.

use crate::formatter::{Formatter, OutputFormat};
use crate::recording::introspect::PropertyView;
use crate::recording::record::{Recordable, SharedRecord};
use crate::utils::errors::{ReporterError, Result};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::debug;

/// Text written for an absent property value
pub const JSON_NULL_VALUE: &str = "null";

#[derive(Serialize)]
struct RecordsDocument<'a> {
    #[serde(rename = "recorderUUID")]
    recorder_uuid: &'a str,
    records: Vec<RecordFields>,
}

#[derive(Serialize)]
struct RecordDocument<'a> {
    #[serde(rename = "recorderUUID")]
    recorder_uuid: &'a str,
    record: RecordFields,
}

/// Properties of one record, serialized as an object in view order
struct RecordFields(PropertyView);

impl Serialize for RecordFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let entries = self.0.entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, value) in entries {
            map.serialize_entry(name, value.as_deref().unwrap_or(JSON_NULL_VALUE))?;
        }
        map.end()
    }
}

/// JSON formatter
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }

    fn render<T: Serialize>(document: &T) -> Result<String> {
        let mut json = serde_json::to_string_pretty(document).map_err(|e| {
            ReporterError::FormattingFailed(format!("JSON serialization error: {}", e))
        })?;
        json.push('\n');
        Ok(json)
    }
}

impl Formatter for JsonFormatter {
    fn format_records(&self, records: &[SharedRecord], session_id: &str) -> Result<String> {
        debug!("Formatting {} records as JSON", records.len());

        let document = RecordsDocument {
            recorder_uuid: session_id,
            records: records
                .iter()
                .map(|record| RecordFields(PropertyView::of(record.as_ref())))
                .collect(),
        };
        Self::render(&document)
    }

    fn format_record(&self, record: &dyn Recordable, session_id: &str) -> Result<String> {
        let document = RecordDocument {
            recorder_uuid: session_id,
            record: RecordFields(PropertyView::of(record)),
        };
        Self::render(&document)
    }

    fn output_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}
