// src/formatter/xml.rs
//! XML report formatter
//!
//! ```text
//! <HtmlUnitReport>
//!   <recorderUUID>...</recorderUUID>
//!   <records>
//!     <record>
//!       <className>...</className>
//!       ...
//!     </record>
//!   </records>
//! </HtmlUnitReport>
//! ```
//!
//! Each property becomes a child element named after it. Characters a name
//! may not contain are replaced with `_`. Absent values become empty
//! elements.

use crate::formatter::escape::escape_xml;
use crate::formatter::{Formatter, OutputFormat};
use crate::recording::introspect::PropertyView;
use crate::recording::record::{Recordable, SharedRecord};
use crate::utils::errors::Result;
use std::borrow::Cow;
use std::fmt::Write as _;
use tracing::debug;

/// Document element of every XML report
pub const XML_ROOT_ELEMENT: &str = "HtmlUnitReport";

const INDENT_RECORD: &str = "    ";
const INDENT_PROPERTY: &str = "      ";

/// XML formatter
#[derive(Debug, Clone, Default)]
pub struct XmlFormatter;

impl XmlFormatter {
    pub fn new() -> Self {
        Self
    }

    fn open_document(xml: &mut String, session_id: &str) {
        let _ = writeln!(xml, "<{}>", XML_ROOT_ELEMENT);
        let _ = writeln!(xml, "  <recorderUUID>{}</recorderUUID>", escape_xml(session_id));
    }

    fn close_document(xml: &mut String) {
        let _ = writeln!(xml, "</{}>", XML_ROOT_ELEMENT);
    }

    fn append_properties(xml: &mut String, record: &dyn Recordable) {
        let view = PropertyView::of(record);
        for (name, value) in view.entries() {
            let name = element_name(name);
            let _ = writeln!(
                xml,
                "{}<{name}>{}</{name}>",
                INDENT_PROPERTY,
                escape_xml(value.as_deref().unwrap_or("")),
            );
        }
    }
}

/// Map a property name onto a valid XML element name
fn element_name(name: &str) -> Cow<'_, str> {
    let is_start = |c: char| c.is_alphabetic() || c == '_';
    let is_rest = |c: char| is_start(c) || c.is_alphanumeric() || matches!(c, '-' | '.');

    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => is_start(first) && chars.all(is_rest),
        None => false,
    };
    if valid {
        return Cow::Borrowed(name);
    }

    let mut fixed: String = name
        .chars()
        .map(|c| if is_rest(c) { c } else { '_' })
        .collect();
    if !fixed.starts_with(is_start) {
        fixed.insert(0, '_');
    }
    Cow::Owned(fixed)
}

impl Formatter for XmlFormatter {
    fn format_records(&self, records: &[SharedRecord], session_id: &str) -> Result<String> {
        debug!("Formatting {} records as XML", records.len());

        let mut xml = String::new();
        Self::open_document(&mut xml, session_id);
        xml.push_str("  <records>\n");
        for record in records {
            let _ = writeln!(xml, "{}<record>", INDENT_RECORD);
            Self::append_properties(&mut xml, record.as_ref());
            let _ = writeln!(xml, "{}</record>", INDENT_RECORD);
        }
        xml.push_str("  </records>\n");
        Self::close_document(&mut xml);

        Ok(xml)
    }

    fn format_record(&self, record: &dyn Recordable, session_id: &str) -> Result<String> {
        let mut xml = String::new();
        Self::open_document(&mut xml, session_id);
        xml.push_str("  <record>\n");
        Self::append_properties(&mut xml, record);
        xml.push_str("  </record>\n");
        Self::close_document(&mut xml);

        Ok(xml)
    }

    fn output_format(&self) -> OutputFormat {
        OutputFormat::Xml
    }
}
