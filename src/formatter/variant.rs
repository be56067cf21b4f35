// src/formatter/variant.rs
//! Rendering variants for the HTML timeline
//!
//! [`RenderingVariant::for_kind`] maps every [`RecordKind`] onto one
//! template. The match is exhaustive: adding a kind does not compile until
//! it is given a variant here.

use crate::formatter::escape::{escape_html, escape_html_attribute};
use crate::recording::introspect::PropertyView;
use crate::recording::record::RecordKind;
use chrono::{TimeZone, Utc};
use std::fmt::Write as _;

const DOUBLE_TAB: &str = "\t\t";
const TAB: &str = "\t";

/// Shown in place of a missing timestamp
pub const MISSING_TIMESTAMP: &str = "N/A";

/// HTML template used for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderingVariant {
    /// Script, style, markup and test-framework activity
    Record,
    /// Captured markup with code and live page panels
    HtmlSnapshot,
    Info,
    Warning,
    Error,
    Debug,
    Success,
}

impl RenderingVariant {
    /// Variant rendering records of `kind`
    pub fn for_kind(kind: RecordKind) -> Self {
        match kind {
            RecordKind::JsRecord
            | RecordKind::CssRecord
            | RecordKind::HtmlRecord
            | RecordKind::JunitRecord => RenderingVariant::Record,
            RecordKind::HtmlSnapshot => RenderingVariant::HtmlSnapshot,
            RecordKind::TestStart | RecordKind::TestEnd | RecordKind::Info => {
                RenderingVariant::Info
            }
            RecordKind::Warning => RenderingVariant::Warning,
            RecordKind::Error => RenderingVariant::Error,
            RecordKind::Debug => RenderingVariant::Debug,
            RecordKind::Success => RenderingVariant::Success,
        }
    }

    /// `data-type` attribute of the rendered entry. Generic records and
    /// snapshots are styled and filtered as debug entries.
    pub fn data_type(self) -> &'static str {
        match self {
            RenderingVariant::Record | RenderingVariant::HtmlSnapshot => "debug",
            RenderingVariant::Info => "info",
            RenderingVariant::Warning => "warning",
            RenderingVariant::Error => "error",
            RenderingVariant::Debug => "debug",
            RenderingVariant::Success => "success",
        }
    }

    /// Message used when the record carries no context
    pub fn default_message(self) -> &'static str {
        match self {
            RenderingVariant::Record => "Client activity recorded.",
            RenderingVariant::HtmlSnapshot => "HTML Snapshot Captured",
            RenderingVariant::Info => "Information recorded.",
            RenderingVariant::Warning => "Warning recorded.",
            RenderingVariant::Error => "Error recorded.",
            RenderingVariant::Debug => "Debug output recorded.",
            RenderingVariant::Success => "Step succeeded.",
        }
    }

    /// Append the timeline entry for one record
    pub fn render(self, html: &mut String, view: &PropertyView) {
        match self {
            RenderingVariant::HtmlSnapshot => render_snapshot(html, view),
            RenderingVariant::Record
            | RenderingVariant::Info
            | RenderingVariant::Warning
            | RenderingVariant::Error
            | RenderingVariant::Debug
            | RenderingVariant::Success => render_standard(html, view, self),
        }
    }
}

/// Timestamp shown on the timeline: epoch milliseconds rendered as UTC,
/// any other text as-is
pub fn display_timestamp(view: &PropertyView) -> String {
    match view.get("timestamp") {
        None => MISSING_TIMESTAMP.to_string(),
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
            .unwrap_or_else(|| raw.to_string()),
    }
}

fn message_or_default(view: &PropertyView, variant: RenderingVariant) -> String {
    view.get("context")
        .filter(|m| !m.is_empty())
        .unwrap_or(variant.default_message())
        .to_string()
}

fn render_standard(html: &mut String, view: &PropertyView, variant: RenderingVariant) {
    let timestamp = display_timestamp(view);
    let message = message_or_default(view, variant);

    let _ = writeln!(
        html,
        "{DOUBLE_TAB}<div class=\"log-entry\" data-type=\"{}\">",
        variant.data_type()
    );
    let _ = writeln!(
        html,
        "{DOUBLE_TAB}{TAB}<span class=\"timestamp\">{}</span>",
        escape_html(&timestamp)
    );
    let _ = writeln!(
        html,
        "{DOUBLE_TAB}{TAB}<span class=\"log-message\">{}</span>",
        escape_html(&message)
    );
    let _ = writeln!(html, "{DOUBLE_TAB}</div>");
}

/// Element ids of one snapshot entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotIds {
    pub code_view: String,
    pub page_view: String,
    pub code_toggle: String,
    pub page_toggle: String,
}

impl SnapshotIds {
    pub fn generate() -> Self {
        let unique = format!("snapshot-{:08x}", rand::random::<u32>());
        Self {
            code_view: format!("code-{unique}"),
            page_view: format!("page-{unique}"),
            code_toggle: format!("toggle-code-{unique}"),
            page_toggle: format!("toggle-page-{unique}"),
        }
    }
}

fn render_snapshot(html: &mut String, view: &PropertyView) {
    let variant = RenderingVariant::HtmlSnapshot;
    let timestamp = display_timestamp(view);
    let message = view
        .get("message")
        .or_else(|| view.get("context"))
        .filter(|m| !m.is_empty())
        .unwrap_or(variant.default_message());
    let content = view.get("htmlContent");
    let ids = SnapshotIds::generate();

    let _ = writeln!(
        html,
        "{DOUBLE_TAB}<div class=\"log-entry snapshot-entry\" data-type=\"{}\">",
        variant.data_type()
    );
    let _ = writeln!(
        html,
        "{DOUBLE_TAB}{TAB}<span class=\"timestamp\">{}</span>",
        escape_html(&timestamp)
    );
    let _ = writeln!(
        html,
        "{DOUBLE_TAB}{TAB}<span class=\"log-message\">{} \
         <button id=\"{}\" onclick=\"toggleSnapshotPanel('{}', this);\">View Code</button> \
         <button id=\"{}\" onclick=\"toggleSnapshotPanel('{}', this);\">View Page</button></span>",
        escape_html(message),
        ids.code_toggle,
        ids.code_view,
        ids.page_toggle,
        ids.page_view,
    );

    // Code panel: markup shown as text
    let _ = writeln!(
        html,
        "{DOUBLE_TAB}{TAB}<div id=\"{}\" class=\"snapshot-panel\" style=\"display:none; margin-top: 10px;\">",
        ids.code_view
    );
    let _ = writeln!(
        html,
        "{DOUBLE_TAB}{DOUBLE_TAB}<pre><code style=\"white-space: pre-wrap; word-break: break-all;\">{}</code></pre>",
        escape_html(content.unwrap_or("<!-- No snapshot content available -->"))
    );
    let _ = writeln!(html, "{DOUBLE_TAB}{TAB}</div>");

    // Page panel: markup rendered live inside a quoted srcdoc attribute
    let _ = writeln!(
        html,
        "{DOUBLE_TAB}{TAB}<div id=\"{}\" class=\"snapshot-panel\" style=\"display:none; margin-top: 10px;\">",
        ids.page_view
    );
    let _ = writeln!(
        html,
        "{DOUBLE_TAB}{DOUBLE_TAB}<iframe style=\"width: 95%; height: 400px; border: 1px solid #ccc;\" \
         sandbox=\"allow-same-origin allow-scripts\" srcdoc=\"{}\"></iframe>",
        escape_html_attribute(
            content.unwrap_or("<html><body>No snapshot content available</body></html>")
        )
    );
    let _ = writeln!(html, "{DOUBLE_TAB}{TAB}</div>");
    let _ = writeln!(html, "{DOUBLE_TAB}</div>");
}
