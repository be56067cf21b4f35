// src/recording/introspect.rs
//! Property views over records
//!
//! Record types declare their properties explicitly through
//! [`Recordable::properties`]. [`PropertyView`] turns that declaration into
//! the name-ordered list every formatter serializes. A property whose value
//! cannot be produced is dropped from the view and reported, the rest of the
//! record still serializes.

use crate::recording::record::Recordable;
use std::borrow::Cow;
use std::fmt;
use tracing::warn;

/// Failure to produce a single property value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyError {
    pub name: String,
    pub reason: String,
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "property `{}` unavailable: {}", self.name, self.reason)
    }
}

impl std::error::Error for PropertyError {}

/// One declared property of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    name: Cow<'static, str>,
    value: Result<Option<String>, String>,
}

impl Property {
    /// Property that always has a value
    pub fn text(name: impl Into<Cow<'static, str>>, value: impl fmt::Display) -> Self {
        Self {
            name: name.into(),
            value: Ok(Some(value.to_string())),
        }
    }

    /// Property whose value may be absent
    pub fn optional<T: fmt::Display>(name: impl Into<Cow<'static, str>>, value: Option<T>) -> Self {
        Self {
            name: name.into(),
            value: Ok(value.map(|v| v.to_string())),
        }
    }

    /// Property whose accessor failed
    pub fn failed(name: impl Into<Cow<'static, str>>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Err(reason.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Name-ordered property values of one record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyView {
    entries: Vec<(String, Option<String>)>,
    skipped: Vec<PropertyError>,
}

impl PropertyView {
    /// Collect, sort and validate the properties of `record`
    pub fn of(record: &dyn Recordable) -> Self {
        let mut entries: Vec<(String, Option<String>)> = Vec::new();
        let mut skipped = Vec::new();

        for property in record.properties() {
            let name = property.name.into_owned();
            match property.value {
                Ok(value) => entries.push((name, value)),
                Err(reason) => {
                    warn!(
                        property = %name,
                        class_name = record.class_name(),
                        method_name = record.method_name(),
                        "Skipping unreadable record property: {}",
                        reason
                    );
                    skipped.push(PropertyError { name, reason });
                }
            }
        }

        // Stable sort keeps the first declaration of a duplicated name first
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.dedup_by(|later, earlier| later.0 == earlier.0);

        Self { entries, skipped }
    }

    /// `(name, value)` pairs in ascending name order
    pub fn entries(&self) -> &[(String, Option<String>)] {
        &self.entries
    }

    /// Value of a property; `None` when absent or undeclared
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .binary_search_by(|(n, _)| n.as_str().cmp(name))
            .ok()
            .and_then(|idx| self.entries[idx].1.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .binary_search_by(|(n, _)| n.as_str().cmp(name))
            .is_ok()
    }

    /// Properties dropped because their accessor failed
    pub fn skipped(&self) -> &[PropertyError] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::recording::record::{base_properties, Record, RecordKind};

    /// Record shape with a failing accessor and an unset value
    #[derive(Debug)]
    pub(crate) struct FlakyRecord;

    impl Recordable for FlakyRecord {
        fn method_name(&self) -> &str {
            "flaky"
        }

        fn class_name(&self) -> &str {
            "FlakyTest"
        }

        fn timestamp(&self) -> Option<i64> {
            None
        }

        fn context(&self) -> &str {
            "ctx"
        }

        fn kind(&self) -> Option<RecordKind> {
            Some(RecordKind::Warning)
        }

        fn properties(&self) -> Vec<Property> {
            let mut properties = base_properties(self);
            properties.push(Property::failed("brokenValue", "accessor panicked"));
            properties.push(Property::optional::<String>("nullValue", None));
            properties
        }
    }

    #[test]
    fn test_view_is_sorted() {
        let record = Record::new("m", "C", RecordKind::Info, "hello")
            .with_attribute("alpha", Some("a".to_string()));
        let view = PropertyView::of(&record);

        let names: Vec<_> = view.entries().iter().map(|(n, _)| n.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(view.get("alpha"), Some("a"));
        assert_eq!(view.get("context"), Some("hello"));
        assert_eq!(view.get("recordType"), Some("Info"));
    }

    #[test]
    fn test_failed_property_is_skipped() {
        let view = PropertyView::of(&FlakyRecord);

        assert!(!view.contains("brokenValue"));
        assert_eq!(view.skipped().len(), 1);
        assert_eq!(view.skipped()[0].name, "brokenValue");
        assert!(view.contains("context"));
    }

    #[test]
    fn test_absent_value_is_kept() {
        let view = PropertyView::of(&FlakyRecord);

        assert!(view.contains("nullValue"));
        assert_eq!(view.get("nullValue"), None);
        assert!(view.contains("timestamp"));
    }

    #[test]
    fn test_duplicate_names_keep_first_declaration() {
        let record = Record::new("m", "C", RecordKind::Info, "original")
            .with_attribute("context", Some("shadow".to_string()));
        let view = PropertyView::of(&record);

        assert_eq!(view.get("context"), Some("original"));
        assert_eq!(
            view.entries().iter().filter(|(n, _)| n == "context").count(),
            1
        );
    }
}
