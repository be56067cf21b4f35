// src/utils/config.rs
//! Reporter configuration
//!
//! Layered with the `config` crate, lowest priority first:
//!
//! 1. Built-in defaults ([`ReporterConfig::DEFAULT_CONFIG`])
//! 2. An optional TOML file (`reporter.toml` unless another path is given)
//! 3. `REPORTER_*` environment variables, `__` between nested keys
//!    (e.g. `REPORTER_OUTPUT__FORMAT=json`)

use crate::formatter::OutputFormat;
use crate::utils::errors::{ReporterError, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use config::builder::DefaultState;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default configuration file, resolved against the working directory
pub const DEFAULT_CONFIG_FILE: &str = "reporter.toml";

/// Top-level reporter configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReporterConfig {
    /// Where and how reports are written
    pub output: OutputConfig,

    /// Test discovery hint handed to the host framework
    #[serde(default)]
    pub scan: ScanConfig,

    /// Log subscriber settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Output settings consumed by the recorder registry
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one report per recorder
    pub path: PathBuf,

    /// Report format
    pub format: OutputFormat,

    /// Never overwrite an existing report; fan out to a new file instead
    pub append: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScanConfig {
    /// Base package the host framework scans for recordable tests
    #[serde(default)]
    pub package: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of the human-readable format
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            output: OutputConfig {
                path: PathBuf::from("./ReporterRecords"),
                format: OutputFormat::Html,
                append: false,
            },
            scan: ScanConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ReporterConfig {
    /// Defaults shipped with the reporter. Also written out by
    /// [`ReporterConfig::write_default_file`].
    pub const DEFAULT_CONFIG: &'static str = r#"[output]
path = "./ReporterRecords"
format = "html"
append = false

[scan]
package = ""

[logging]
level = "info"
json = false
"#;

    /// Load from [`DEFAULT_CONFIG_FILE`] (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from a specific file (if present) and the environment
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading reporter configuration from {:?}", path);

        let builder = Self::make_default_config()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("REPORTER")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let config = Self::build_and_deserialize(builder)?;
        info!(
            "Reporter configuration loaded: format={}, path={:?}, append={}",
            config.output.format, config.output.path, config.output.append
        );
        Ok(config)
    }

    /// Parse a TOML document layered over the built-in defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let builder = Self::make_default_config()
            .add_source(File::from_str(contents, FileFormat::Toml));
        Self::build_and_deserialize(builder)
    }

    /// Write [`ReporterConfig::DEFAULT_CONFIG`] to `path` unless a file is
    /// already there. Returns whether a file was created.
    pub fn write_default_file(path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        if path.exists() {
            return Ok(false);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ReporterError::storage(parent, e))?;
        }
        std::fs::write(path, Self::DEFAULT_CONFIG).map_err(|e| ReporterError::storage(path, e))?;

        info!("Created default reporter configuration at {:?}", path);
        Ok(true)
    }

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build_and_deserialize(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_builtin_document() {
        let parsed = ReporterConfig::from_toml_str("").unwrap();
        assert_eq!(parsed, ReporterConfig::default());
        assert_eq!(parsed.output.format, OutputFormat::Html);
        assert!(!parsed.output.append);
    }

    #[test]
    fn test_partial_override() {
        let parsed = ReporterConfig::from_toml_str(
            r#"
            [output]
            format = "JSON"
            append = true
            "#,
        )
        .unwrap();

        assert_eq!(parsed.output.format, OutputFormat::Json);
        assert!(parsed.output.append);
        assert_eq!(parsed.output.path, PathBuf::from("./ReporterRecords"));
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = ReporterConfig::from_toml_str(
            r#"
            [output]
            format = "csv"
            "#,
        );
        assert!(matches!(result, Err(ReporterError::ConfigError(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config = ReporterConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.output.format, OutputFormat::Html);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reporter.toml");
        std::fs::write(
            &path,
            "[output]\npath = \"out/records\"\nformat = \"xml\"\nappend = false\n",
        )
        .unwrap();

        let config = ReporterConfig::load_from(&path).unwrap();
        assert_eq!(config.output.format, OutputFormat::Xml);
        assert_eq!(config.output.path, PathBuf::from("out/records"));
    }

    #[test]
    fn test_write_default_file_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("reporter.toml");

        assert!(ReporterConfig::write_default_file(&path).unwrap());
        assert!(!ReporterConfig::write_default_file(&path).unwrap());

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, ReporterConfig::DEFAULT_CONFIG);
    }
}
