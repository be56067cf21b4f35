// src/formatter/mod.rs
//! Render recorded events to report documents
//!
//! Supports:
//! - JSON (data interchange, every value a string)
//! - XML (`HtmlUnitReport` document)
//! - HTML (standalone interactive timeline)
//!
//! Each formatter has two entry points. For JSON and XML the single-record
//! form produces a `record` root instead of a `records` list, so it is not
//! a one-element call to the list form.

pub mod escape;
pub mod html;
pub mod json;
pub mod variant;
pub mod xml;

use crate::recording::record::{Recordable, SharedRecord};
use crate::utils::errors::{ReporterError, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub use html::HtmlFormatter;
pub use json::JsonFormatter;
pub use variant::RenderingVariant;
pub use xml::XmlFormatter;

/// Serializer from records to one report format
pub trait Formatter: Send + Sync {
    /// Render an ordered list of records
    fn format_records(&self, records: &[SharedRecord], session_id: &str) -> Result<String>;

    /// Render one record
    fn format_record(&self, record: &dyn Recordable, session_id: &str) -> Result<String>;

    /// Format produced by this formatter
    fn output_format(&self) -> OutputFormat;
}

/// Report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum OutputFormat {
    Json,
    Xml,
    #[default]
    Html,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
            OutputFormat::Html => "html",
        }
    }

    /// File extension of written reports
    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    /// Formatter for this format
    pub fn formatter(self) -> Arc<dyn Formatter> {
        match self {
            OutputFormat::Json => Arc::new(JsonFormatter::new()),
            OutputFormat::Xml => Arc::new(XmlFormatter::new()),
            OutputFormat::Html => Arc::new(HtmlFormatter::new()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ReporterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "xml" => Ok(OutputFormat::Xml),
            "html" => Ok(OutputFormat::Html),
            _ => Err(ReporterError::InvalidOutputFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = ReporterError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::record::{Record, RecordKind};

    #[test]
    fn test_parse_formats() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(" XML ".parse::<OutputFormat>().unwrap(), OutputFormat::Xml);
        assert_eq!("Html".parse::<OutputFormat>().unwrap(), OutputFormat::Html);

        let err = "csv".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, ReporterError::InvalidOutputFormat(ref s) if s == "csv"));
    }

    #[test]
    fn test_default_is_html() {
        assert_eq!(OutputFormat::default(), OutputFormat::Html);
    }

    #[test]
    fn test_formatter_matches_format() {
        for format in [OutputFormat::Json, OutputFormat::Xml, OutputFormat::Html] {
            assert_eq!(format.formatter().output_format(), format);
        }
    }

    #[test]
    fn test_every_formatter_renders_records() {
        let records: Vec<SharedRecord> = vec![
            Arc::new(Record::new("test1", "class1", RecordKind::HtmlRecord, "status1")),
            Arc::new(Record::new("test2", "class2", RecordKind::CssRecord, "status2")),
        ];

        for format in [OutputFormat::Json, OutputFormat::Xml, OutputFormat::Html] {
            let output = format.formatter().format_records(&records, "uuid-1").unwrap();
            assert!(output.contains("uuid-1"), "{format} output lacks session id");
            assert!(output.contains("status2"), "{format} output lacks record");
        }
    }
}
