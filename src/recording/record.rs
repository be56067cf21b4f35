// src/recording/record.rs
//! Immutable records of observed test and browser events
//!
//! Every record shape implements [`Recordable`], which exposes the common
//! provenance fields and declares its own property list for the formatters.
//! Formatters only ever see `dyn Recordable`.

use crate::recording::introspect::Property;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Shared handle to any record shape
pub type SharedRecord = Arc<dyn Recordable>;

/// Record kinds
///
/// A closed set: the HTML dispatcher matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Script execution
    JsRecord,
    /// Stylesheet activity
    CssRecord,
    /// Markup activity
    HtmlRecord,
    /// Test framework output
    JunitRecord,
    /// Captured page markup
    HtmlSnapshot,
    /// A test started
    TestStart,
    /// A test finished
    TestEnd,
    Info,
    Warning,
    Error,
    Debug,
    Success,
}

impl RecordKind {
    /// Every kind, in declaration order
    pub const ALL: [RecordKind; 12] = [
        RecordKind::JsRecord,
        RecordKind::CssRecord,
        RecordKind::HtmlRecord,
        RecordKind::JunitRecord,
        RecordKind::HtmlSnapshot,
        RecordKind::TestStart,
        RecordKind::TestEnd,
        RecordKind::Info,
        RecordKind::Warning,
        RecordKind::Error,
        RecordKind::Debug,
        RecordKind::Success,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::JsRecord => "JsRecord",
            RecordKind::CssRecord => "CssRecord",
            RecordKind::HtmlRecord => "HtmlRecord",
            RecordKind::JunitRecord => "JunitRecord",
            RecordKind::HtmlSnapshot => "HtmlSnapshot",
            RecordKind::TestStart => "TestStart",
            RecordKind::TestEnd => "TestEnd",
            RecordKind::Info => "Info",
            RecordKind::Warning => "Warning",
            RecordKind::Error => "Error",
            RecordKind::Debug => "Debug",
            RecordKind::Success => "Success",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no [`RecordKind`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRecordKind(pub String);

impl fmt::Display for UnknownRecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown record kind: {}", self.0)
    }
}

impl std::error::Error for UnknownRecordKind {}

impl FromStr for RecordKind {
    type Err = UnknownRecordKind;

    /// Accepts `HtmlSnapshot`, `html_snapshot` and `Html_Snapshot` alike
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        RecordKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| UnknownRecordKind(s.to_string()))
    }
}

/// Common view of every record shape
pub trait Recordable: fmt::Debug + Send + Sync {
    /// Test method the event belongs to
    fn method_name(&self) -> &str;

    /// Simple name of the test class
    fn class_name(&self) -> &str;

    /// Milliseconds since the Unix epoch, if known
    fn timestamp(&self) -> Option<i64>;

    /// Free-form payload
    fn context(&self) -> &str;

    /// `None` when the producer did not classify the record
    fn kind(&self) -> Option<RecordKind>;

    /// Declared properties in any order; formatters sort them by name
    fn properties(&self) -> Vec<Property>;
}

/// The five properties every record shape exposes
pub fn base_properties(record: &dyn Recordable) -> Vec<Property> {
    vec![
        Property::text("className", record.class_name()),
        Property::text("context", record.context()),
        Property::text("methodName", record.method_name()),
        Property::optional("recordType", record.kind()),
        Property::optional("timestamp", record.timestamp()),
    ]
}

/// Current wall-clock time in epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// General-purpose record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    method_name: String,
    class_name: String,
    kind: RecordKind,
    context: String,
    timestamp: Option<i64>,
    attributes: BTreeMap<String, Option<String>>,
}

impl Record {
    pub fn new(
        method_name: impl Into<String>,
        class_name: impl Into<String>,
        kind: RecordKind,
        context: impl Into<String>,
    ) -> Self {
        Self {
            method_name: method_name.into(),
            class_name: class_name.into(),
            kind,
            context: context.into(),
            timestamp: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Stamp with the current time
    pub fn stamped_now(self) -> Self {
        self.with_timestamp(now_millis())
    }

    /// Attach an extra named property. Names colliding with the base
    /// properties are ignored by the formatters.
    pub fn with_attribute(mut self, name: impl Into<String>, value: Option<String>) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn attributes(&self) -> &BTreeMap<String, Option<String>> {
        &self.attributes
    }
}

impl Recordable for Record {
    fn method_name(&self) -> &str {
        &self.method_name
    }

    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    fn context(&self) -> &str {
        &self.context
    }

    fn kind(&self) -> Option<RecordKind> {
        Some(self.kind)
    }

    fn properties(&self) -> Vec<Property> {
        let mut properties = base_properties(self);
        properties.extend(
            self.attributes
                .iter()
                .map(|(name, value)| Property::optional(name.clone(), value.clone())),
        );
        properties
    }
}

/// Client-side action observed on the browser (window opened, page changed, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientActionRecord {
    method_name: String,
    class_name: String,
    timestamp: i64,
    context: String,
}

impl ClientActionRecord {
    pub fn new(
        method_name: impl Into<String>,
        class_name: impl Into<String>,
        timestamp: i64,
        context: impl Into<String>,
    ) -> Self {
        Self {
            method_name: method_name.into(),
            class_name: class_name.into(),
            timestamp,
            context: context.into(),
        }
    }
}

impl Recordable for ClientActionRecord {
    fn method_name(&self) -> &str {
        &self.method_name
    }

    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn timestamp(&self) -> Option<i64> {
        Some(self.timestamp)
    }

    fn context(&self) -> &str {
        &self.context
    }

    fn kind(&self) -> Option<RecordKind> {
        Some(RecordKind::Info)
    }

    fn properties(&self) -> Vec<Property> {
        base_properties(self)
    }
}

/// Markup captured from the page at a point in the test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    method_name: String,
    class_name: String,
    timestamp: Option<i64>,
    message: Option<String>,
    html_content: Option<String>,
}

impl SnapshotRecord {
    pub fn new(
        method_name: impl Into<String>,
        class_name: impl Into<String>,
        html_content: impl Into<String>,
    ) -> Self {
        Self {
            method_name: method_name.into(),
            class_name: class_name.into(),
            timestamp: Some(now_millis()),
            message: None,
            html_content: Some(html_content.into()),
        }
    }

    /// Snapshot whose capture produced no markup
    pub fn empty(method_name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            class_name: class_name.into(),
            timestamp: Some(now_millis()),
            message: None,
            html_content: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: Option<i64>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn html_content(&self) -> Option<&str> {
        self.html_content.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl Recordable for SnapshotRecord {
    fn method_name(&self) -> &str {
        &self.method_name
    }

    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    fn context(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }

    fn kind(&self) -> Option<RecordKind> {
        Some(RecordKind::HtmlSnapshot)
    }

    fn properties(&self) -> Vec<Property> {
        let mut properties = base_properties(self);
        properties.push(Property::optional("htmlContent", self.html_content.clone()));
        properties.push(Property::optional("message", self.message.clone()));
        properties
    }
}
