// src/formatter/escape.rs
//! Escaping for the markup formats
//!
//! HTML text content and HTML attribute values use different rules. Quotes
//! are left alone in content and escaped in attributes, so the two
//! functions are not interchangeable.

use quick_xml::escape::{escape, partial_escape};
use std::borrow::Cow;

/// Escape XML text: `& < > " '`
pub fn escape_xml(value: &str) -> Cow<'_, str> {
    escape(value)
}

/// Escape HTML text content: `& < >`
pub fn escape_html(value: &str) -> Cow<'_, str> {
    partial_escape(value)
}

/// Escape a quoted HTML attribute value: `& < > " '`
pub fn escape_html_attribute(value: &str) -> Cow<'_, str> {
    escape(value)
}
