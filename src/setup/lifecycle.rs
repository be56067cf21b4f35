// src/setup/lifecycle.rs
//! Test lifecycle recording
//!
//! Turns start and finish signals of individual tests into `TestStart` and
//! `TestEnd` records, followed by one outcome record. Only tests accepted
//! by the recordable predicate are recorded.

use crate::recording::record::{Record, RecordKind};
use crate::recording::registry::RecorderRegistry;
use crate::setup::session_key::SessionKey;
use dashmap::DashMap;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info};

pub const TEST_STARTED_MESSAGE: &str = "Test started.";
pub const TEST_FINISHED_MESSAGE: &str = "Test finished.";

/// Result of one test execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    Passed,
    Failed(String),
    Skipped(String),
}

impl TestOutcome {
    /// Kind of the outcome record
    pub fn record_kind(&self) -> RecordKind {
        match self {
            TestOutcome::Passed => RecordKind::Success,
            TestOutcome::Failed(_) => RecordKind::Error,
            TestOutcome::Skipped(_) => RecordKind::Warning,
        }
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestOutcome::Passed => f.write_str("Test passed."),
            TestOutcome::Failed(reason) => write!(f, "Test failed: {reason}"),
            TestOutcome::Skipped(reason) => write!(f, "Test skipped: {reason}"),
        }
    }
}

type RecordablePredicate = Box<dyn Fn(&SessionKey) -> bool + Send + Sync>;

/// Records test start and finish signals into per-test recorders
pub struct TestLifecycleRecorder<'a> {
    registry: &'a RecorderRegistry,
    recordable: RecordablePredicate,
    started: DashMap<String, Instant>,
}

impl<'a> TestLifecycleRecorder<'a> {
    /// Record every test
    pub fn new(registry: &'a RecorderRegistry) -> Self {
        Self::with_predicate(registry, |_| true)
    }

    /// Record only tests inside the configured `scan.package`, or every test
    /// when it is empty
    pub fn from_config(registry: &'a RecorderRegistry) -> Self {
        let package = registry.config().scan.package.clone();
        Self::with_predicate(registry, move |key| in_package(key.as_str(), &package))
    }

    pub fn with_predicate(
        registry: &'a RecorderRegistry,
        recordable: impl Fn(&SessionKey) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            registry,
            recordable: Box::new(recordable),
            started: DashMap::new(),
        }
    }

    /// Record the start of `key`. Returns `false` if the test is not recordable.
    pub fn execution_started(&self, key: &str) -> bool {
        let key = SessionKey::parse(key);
        if !(self.recordable)(&key) {
            debug!("Skipping lifecycle recording for {}", key);
            return false;
        }

        self.started.insert(key.as_str().to_string(), Instant::now());
        let start = Record::new(
            key.method_name(),
            key.class_name(),
            RecordKind::TestStart,
            TEST_STARTED_MESSAGE,
        )
        .stamped_now();
        self.registry.obtain_recorder(key.as_str()).add_record(start);
        true
    }

    /// Record the end of `key` and its outcome. Returns `false` if the test
    /// is not recordable.
    pub fn execution_finished(&self, key: &str, outcome: &TestOutcome) -> bool {
        let key = SessionKey::parse(key);
        if !(self.recordable)(&key) {
            return false;
        }

        let mut end = Record::new(
            key.method_name(),
            key.class_name(),
            RecordKind::TestEnd,
            TEST_FINISHED_MESSAGE,
        )
        .stamped_now();
        if let Some((_, started)) = self.started.remove(key.as_str()) {
            end = end.with_attribute(
                "durationMs",
                Some(started.elapsed().as_millis().to_string()),
            );
        }

        let recorder = self.registry.obtain_recorder(key.as_str());
        recorder.add_record(end);
        recorder.add_record(
            Record::new(
                key.method_name(),
                key.class_name(),
                outcome.record_kind(),
                outcome.to_string(),
            )
            .stamped_now(),
        );

        info!("{}: {}", key, outcome);
        true
    }
}

fn in_package(key: &str, package: &str) -> bool {
    if package.is_empty() {
        return true;
    }
    key.strip_prefix(package)
        .map_or(false, |rest| rest.is_empty() || rest.starts_with('.') || rest.starts_with('#'))
}
