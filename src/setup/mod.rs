// src/setup/mod.rs
//! Recording setup
//!
//! Session-key decoding, recording strategies, the client builder and test
//! lifecycle recording.

pub mod builder;
pub mod lifecycle;
pub mod session_key;
pub mod strategy;
pub mod window;

pub use builder::RecordingClientBuilder;
pub use lifecycle::{TestLifecycleRecorder, TestOutcome};
pub use session_key::SessionKey;
pub use strategy::{RecordingStrategy, StrategyBinding};
pub use window::WindowActionRecordingStrategy;
