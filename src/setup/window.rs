// src/setup/window.rs
//! Window lifecycle recording
//!
//! Every window event becomes exactly one `Info` record stamped with the
//! current time and a fixed message.

use crate::client::{BrowserClient, SubscriptionId, WindowEvent, WindowListener};
use crate::recording::record::{now_millis, ClientActionRecord};
use crate::recording::recorder::Recorder;
use crate::recording::registry::RecorderRegistry;
use crate::setup::strategy::{RecordingStrategy, StrategyBinding};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

pub const WINDOW_OPENED_MESSAGE: &str = "Web window opened.";
pub const WINDOW_CHANGED_MESSAGE: &str = "Web window changed";
pub const WINDOW_CLOSED_MESSAGE: &str = "Web window closed";

/// Records window open, content-change and close events
pub struct WindowActionRecordingStrategy {
    binding: StrategyBinding,
    subscriptions: Mutex<Vec<SubscriptionId>>,
}

impl WindowActionRecordingStrategy {
    pub fn new(registry: &RecorderRegistry, key: impl Into<String>) -> Self {
        Self {
            binding: StrategyBinding::new(registry, key),
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Detach from `client`. Returns how many listeners were removed.
    pub fn unregister(&self, client: &dyn BrowserClient) -> usize {
        self.subscriptions
            .lock()
            .drain(..)
            .filter(|id| client.unsubscribe(*id))
            .count()
    }
}

impl RecordingStrategy for WindowActionRecordingStrategy {
    fn prepare_and_register(&self, client: &dyn BrowserClient) {
        let listener = WindowActionRecorder {
            recorder: Arc::clone(self.binding.recorder()),
            class_name: self.binding.class_name().to_string(),
            method_name: self.binding.method_name().to_string(),
        };
        let id = client.subscribe(Arc::new(listener));
        self.subscriptions.lock().push(id);
        debug!("Window recording attached for {}", self.binding.key());
    }

    fn binding(&self) -> &StrategyBinding {
        &self.binding
    }
}

struct WindowActionRecorder {
    recorder: Arc<Recorder>,
    class_name: String,
    method_name: String,
}

impl WindowActionRecorder {
    fn record(&self, message: &str) {
        self.recorder.add_record(ClientActionRecord::new(
            self.method_name.as_str(),
            self.class_name.as_str(),
            now_millis(),
            message,
        ));
    }
}

impl WindowListener for WindowActionRecorder {
    fn window_opened(&self, _event: &WindowEvent) {
        self.record(WINDOW_OPENED_MESSAGE);
    }

    fn window_content_changed(&self, _event: &WindowEvent) {
        self.record(WINDOW_CHANGED_MESSAGE);
    }

    fn window_closed(&self, _event: &WindowEvent) {
        self.record(WINDOW_CLOSED_MESSAGE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::EventHub;
    use crate::recording::record::RecordKind;
    use crate::utils::config::ReporterConfig;
    use tempfile::TempDir;

    fn registry(dir: &TempDir) -> RecorderRegistry {
        let mut config = ReporterConfig::default();
        config.output.path = dir.path().to_path_buf();
        RecorderRegistry::new(config)
    }

    #[test]
    fn test_each_event_adds_one_record() {
        let dir = TempDir::new().unwrap();
        let registry = registry(&dir);
        let hub = EventHub::new();
        let strategy = WindowActionRecordingStrategy::new(&registry, "org.example.Nav#opensHome");
        strategy.prepare_and_register(&hub);

        let event = WindowEvent::new("main");
        hub.fire_window_opened(&event);
        hub.fire_window_content_changed(&event);
        hub.fire_window_closed(&event);

        let records = strategy.binding().recorder().records();
        let messages: Vec<_> = records.iter().map(|r| r.context()).collect();
        assert_eq!(
            messages,
            [WINDOW_OPENED_MESSAGE, WINDOW_CHANGED_MESSAGE, WINDOW_CLOSED_MESSAGE]
        );
        for record in &records {
            assert_eq!(record.kind(), Some(RecordKind::Info));
            assert_eq!(record.class_name(), "Nav");
            assert_eq!(record.method_name(), "opensHome");
            assert!(record.timestamp().is_some());
        }
    }

    #[test]
    fn test_unregister_stops_recording() {
        let dir = TempDir::new().unwrap();
        let registry = registry(&dir);
        let hub = EventHub::new();
        let strategy = WindowActionRecordingStrategy::new(&registry, "A#b");
        strategy.prepare_and_register(&hub);

        assert_eq!(strategy.unregister(&hub), 1);
        hub.fire_window_opened(&WindowEvent::new("main"));

        assert!(registry.obtain_recorder("A#b").is_empty());
    }
}
