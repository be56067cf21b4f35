// src/lib.rs
//! Sentra Lab Test Reporter Library
//!
//! Records what happens while browser tests run and renders it as JSON,
//! XML or a standalone HTML timeline.
//!
//! # Architecture
//!
//! - **recording**: records, property views, recorders and the registry
//! - **formatter**: JSON / XML / HTML serializers and HTML rendering variants
//! - **setup**: session keys, recording strategies, client builder, test lifecycle
//! - **client**: window event source the strategies subscribe to
//! - **observability**: tracing subscriber setup
//! - **utils**: configuration and errors

// Public module exports
pub mod client;
pub mod formatter;
pub mod observability;
pub mod recording;
pub mod setup;
pub mod utils;

// Re-export commonly used types
pub use formatter::{Formatter, OutputFormat};
pub use recording::{Record, RecordKind, Recordable, Recorder, RecorderRegistry};
pub use setup::{RecordingClientBuilder, SessionKey, TestLifecycleRecorder, TestOutcome};
pub use utils::config::ReporterConfig;
pub use utils::errors::{ReporterError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
