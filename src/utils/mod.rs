// src/utils/mod.rs
//! Configuration and error plumbing shared by every module

pub mod config;
pub mod errors;

pub use self::config::{LoggingConfig, OutputConfig, ReporterConfig, ScanConfig};
pub use self::errors::{ReporterError, Result};
