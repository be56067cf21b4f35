// src/recording/mod.rs
//! Event recording
//!
//! - **Record**: immutable event descriptions and the [`Recordable`] view
//! - **Introspect**: name-ordered property views the formatters serialize
//! - **Recorder**: per-session accumulation and flushing
//! - **Registry**: session key to recorder map with atomic get-or-create
//! - **Storage**: report destinations and append-mode fan-out
//!
//! # Architecture
//!
//! ```text
//! strategy / lifecycle → Registry.obtain_recorder(key) → Recorder.add_record()
//!                                                            ↓
//!                                                  save_all_records()
//!                                                            ↓
//!                                              Formatter (json/xml/html)
//!                                                            ↓
//!                                                  Destination.write()
//! ```

pub mod introspect;
pub mod record;
pub mod recorder;
pub mod registry;
pub mod storage;

// Re-export commonly used types
pub use introspect::{Property, PropertyError, PropertyView};
pub use record::{
    ClientActionRecord, Record, RecordKind, Recordable, SharedRecord, SnapshotRecord,
};
pub use recorder::{Recorder, RecorderStats};
pub use registry::RecorderRegistry;
pub use storage::Destination;
