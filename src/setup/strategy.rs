// src/setup/strategy.rs
//! Recording strategies
//!
//! A strategy is bound to one session key. Binding resolves the key's
//! recorder through a registry and decodes the class and method names that
//! every record produced by the strategy carries.

use crate::client::BrowserClient;
use crate::recording::recorder::Recorder;
use crate::recording::registry::RecorderRegistry;
use crate::setup::session_key::SessionKey;
use std::sync::Arc;

/// Something that attaches recording behaviour to a browser client
pub trait RecordingStrategy: Send + Sync {
    /// Install listeners on `client`
    fn prepare_and_register(&self, client: &dyn BrowserClient);

    fn binding(&self) -> &StrategyBinding;
}

/// Recorder and decoded names for one session key
#[derive(Debug, Clone)]
pub struct StrategyBinding {
    key: SessionKey,
    recorder: Arc<Recorder>,
}

impl StrategyBinding {
    /// Bind `key` to its recorder in `registry`
    pub fn new(registry: &RecorderRegistry, key: impl Into<String>) -> Self {
        let key = SessionKey::parse(key);
        let recorder = registry.obtain_recorder(key.as_str());
        Self { key, recorder }
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    pub fn recorder(&self) -> &Arc<Recorder> {
        &self.recorder
    }

    pub fn class_name(&self) -> &str {
        self.key.class_name()
    }

    pub fn method_name(&self) -> &str {
        self.key.method_name()
    }
}
