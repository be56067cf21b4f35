// src/setup/session_key.rs
//! Session keys of the form `pkg.ClassName#methodName`
//!
//! Decoding is purely textual and never fails: a key without `#` has an
//! empty method name.

use std::fmt;

/// Decoded session key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    raw: String,
    class_name: String,
    method_name: String,
}

impl SessionKey {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let class_name = class_name_of(&raw).to_string();
        let method_name = method_name_of(&raw).to_string();
        Self {
            raw,
            class_name,
            method_name,
        }
    }

    /// Key for a class and method, fully qualified
    pub fn compose(qualified_class: &str, method_name: &str) -> Self {
        Self::parse(format!("{qualified_class}#{method_name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Last dotted segment of the class part
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Segment after the first `#`, or `""`
pub fn method_name_of(key: &str) -> &str {
    key.split('#').nth(1).unwrap_or("")
}

/// Last non-empty dotted segment before `#`
pub fn class_name_of(key: &str) -> &str {
    let class_part = key.split('#').next().unwrap_or("");
    class_part
        .rsplit('.')
        .find(|segment| !segment.is_empty())
        .unwrap_or(class_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_qualified_key() {
        let key = SessionKey::parse("org.example.MyClass#myMethod");
        assert_eq!(key.class_name(), "MyClass");
        assert_eq!(key.method_name(), "myMethod");
        assert_eq!(key.to_string(), "org.example.MyClass#myMethod");
    }

    #[test]
    fn test_key_without_hash() {
        let key = SessionKey::parse("org.example.MyClass");
        assert_eq!(key.class_name(), "MyClass");
        assert_eq!(key.method_name(), "");
    }

    #[test]
    fn test_many_package_segments() {
        let key = SessionKey::parse("org.htmlunit.more.packages.myclass#mymethod");
        assert_eq!(key.class_name(), "myclass");
        assert_eq!(key.method_name(), "mymethod");
    }

    #[test]
    fn test_unqualified_and_degenerate_keys() {
        assert_eq!(class_name_of("Plain#run"), "Plain");
        assert_eq!(method_name_of("Plain#"), "");
        assert_eq!(method_name_of("A#b#c"), "b");
        assert_eq!(class_name_of(""), "");
        assert_eq!(method_name_of(""), "");
    }

    #[test]
    fn test_compose() {
        let key = SessionKey::compose("suite.LoginTest", "rejectsBadPassword");
        assert_eq!(key.as_str(), "suite.LoginTest#rejectsBadPassword");
        assert_eq!(key.class_name(), "LoginTest");
    }

    proptest! {
        #[test]
        fn prop_compose_then_decode(
            package in "[a-z]{1,8}(\\.[a-z]{1,8}){0,3}",
            class in "[A-Z][A-Za-z0-9]{0,12}",
            method in "[a-z][A-Za-z0-9_]{0,12}",
        ) {
            let key = SessionKey::compose(&format!("{package}.{class}"), &method);
            prop_assert_eq!(key.class_name(), class.as_str());
            prop_assert_eq!(key.method_name(), method.as_str());
        }
    }
}
