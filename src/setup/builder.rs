// src/setup/builder.rs
//! Client builder that wires recording strategies onto a client

use crate::client::{BrowserClient, EventHub};
use crate::recording::registry::RecorderRegistry;
use crate::setup::strategy::RecordingStrategy;
use crate::setup::window::WindowActionRecordingStrategy;
use std::sync::Arc;
use tracing::info;

/// Collects strategies for one session key
pub struct RecordingClientBuilder<'a> {
    registry: &'a RecorderRegistry,
    key: String,
    strategies: Vec<Arc<dyn RecordingStrategy>>,
}

impl<'a> RecordingClientBuilder<'a> {
    pub fn new(registry: &'a RecorderRegistry, key: impl Into<String>) -> Self {
        Self {
            registry,
            key: key.into(),
            strategies: Vec::new(),
        }
    }

    /// Builder bound to the process-wide registry
    pub fn with_global(key: impl Into<String>) -> RecordingClientBuilder<'static> {
        RecordingClientBuilder::new(RecorderRegistry::global(), key)
    }

    pub fn add_window_action_recording(mut self) -> Self {
        let strategy = WindowActionRecordingStrategy::new(self.registry, self.key.as_str());
        self.strategies.push(Arc::new(strategy));
        self
    }

    pub fn add_strategy(mut self, strategy: Arc<dyn RecordingStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn strategies(&self) -> &[Arc<dyn RecordingStrategy>] {
        &self.strategies
    }

    /// Register every strategy on an existing client
    pub fn apply(&self, client: &dyn BrowserClient) {
        for strategy in &self.strategies {
            strategy.prepare_and_register(client);
        }
        info!(
            "Applied {} recording strategies for {}",
            self.strategies.len(),
            self.key
        );
    }

    /// Fresh in-process client with every strategy registered
    pub fn build(self) -> EventHub {
        let hub = EventHub::new();
        self.apply(&hub);
        hub
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::WindowEvent;
    use crate::utils::config::ReporterConfig;
    use tempfile::TempDir;

    #[test]
    fn test_build_registers_strategies() {
        let dir = TempDir::new().unwrap();
        let mut config = ReporterConfig::default();
        config.output.path = dir.path().to_path_buf();
        let registry = RecorderRegistry::new(config);

        let hub = RecordingClientBuilder::new(&registry, "suite.Search#findsResults")
            .add_window_action_recording()
            .build();
        assert_eq!(hub.listener_count(), 1);

        hub.fire_window_opened(&WindowEvent::new("main"));
        let recorder = registry.get_recorder("suite.Search#findsResults").unwrap();
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn test_build_without_strategies() {
        let dir = TempDir::new().unwrap();
        let mut config = ReporterConfig::default();
        config.output.path = dir.path().to_path_buf();
        let registry = RecorderRegistry::new(config);

        let hub = RecordingClientBuilder::new(&registry, "a#b").build();
        assert_eq!(hub.listener_count(), 0);
        assert!(registry.is_empty());
    }
}
