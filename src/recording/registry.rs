// src/recording/registry.rs
//! Recorder registry
//!
//! Maps session keys to recorders. [`RecorderRegistry::obtain_recorder`]
//! goes through the map's entry API, so concurrent callers asking for the
//! same key always share one recorder.

use crate::recording::recorder::Recorder;
use crate::recording::storage::{sanitize_file_component, Destination};
use crate::utils::config::ReporterConfig;
use crate::utils::errors::Result;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

static GLOBAL_REGISTRY: OnceCell<RecorderRegistry> = OnceCell::new();

/// Thread-safe map from session key to recorder
pub struct RecorderRegistry {
    recorders: DashMap<String, Arc<Recorder>>,
    config: ReporterConfig,
}

impl RecorderRegistry {
    pub fn new(config: ReporterConfig) -> Self {
        debug!(
            "Creating recorder registry ({} output in {})",
            config.output.format,
            config.output.path.display()
        );
        Self {
            recorders: DashMap::new(),
            config,
        }
    }

    /// Install the process-wide registry. Returns `false` if one exists.
    pub fn init_global(config: ReporterConfig) -> bool {
        GLOBAL_REGISTRY.set(Self::new(config)).is_ok()
    }

    /// Process-wide registry, configured from `reporter.toml` and the
    /// environment on first use unless [`init_global`](Self::init_global)
    /// ran earlier
    pub fn global() -> &'static RecorderRegistry {
        GLOBAL_REGISTRY.get_or_init(|| {
            let config = ReporterConfig::load().unwrap_or_else(|e| {
                warn!("Falling back to default reporter configuration: {}", e);
                ReporterConfig::default()
            });
            Self::new(config)
        })
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    /// File a recorder for `key` writes to
    pub fn destination_for(&self, key: &str) -> PathBuf {
        let format = self.config.output.format;
        self.config.output.path.join(format!(
            "{}Records{}.{}",
            format.as_str(),
            sanitize_file_component(key),
            format.extension()
        ))
    }

    /// Recorder for `key`, created on first request
    pub fn obtain_recorder(&self, key: &str) -> Arc<Recorder> {
        let entry = self.recorders.entry(key.to_string()).or_insert_with(|| {
            info!("Creating recorder for {}", key);
            metrics::counter!("reporter_recorders_created_total").increment(1);
            let destination = Destination::new(self.destination_for(key), self.config.output.append);
            Arc::new(Recorder::for_format(self.config.output.format, destination))
        });
        Arc::clone(entry.value())
    }

    pub fn get_recorder(&self, key: &str) -> Option<Arc<Recorder>> {
        self.recorders.get(key).map(|entry| Arc::clone(entry.value()))
    }

    pub fn remove_recorder(&self, key: &str) -> Option<Arc<Recorder>> {
        match self.recorders.remove(key) {
            Some((_, recorder)) => {
                debug!("Removed recorder for {}", key);
                Some(recorder)
            }
            None => {
                debug!("No recorder registered for {}", key);
                None
            }
        }
    }

    pub fn contains_recorder(&self, key: &str) -> bool {
        self.recorders.contains_key(key)
    }

    /// Copy of the current key to recorder mapping
    pub fn all_recorders(&self) -> Vec<(String, Arc<Recorder>)> {
        self.recorders
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect()
    }

    pub fn clear_all_recorders(&self) {
        let count = self.recorders.len();
        self.recorders.clear();
        info!("Cleared {} recorders", count);
    }

    pub fn len(&self) -> usize {
        self.recorders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recorders.is_empty()
    }

    /// Save every recorder's accumulated records. A failing recorder does
    /// not stop the others.
    pub fn save_all(&self) -> Vec<(String, Result<PathBuf>)> {
        let mut outcomes: Vec<_> = self
            .all_recorders()
            .into_iter()
            .map(|(key, recorder)| {
                let outcome = recorder.save_all_records();
                if let Err(e) = &outcome {
                    error!("Failed to save recorder {}: {}", key, e);
                }
                (key, outcome)
            })
            .collect();
        outcomes.sort_by(|a, b| a.0.cmp(&b.0));
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::OutputFormat;
    use crate::recording::record::{Record, RecordKind};
    use std::sync::Barrier;
    use std::thread;
    use tempfile::TempDir;

    fn registry_in(dir: &TempDir, format: OutputFormat) -> RecorderRegistry {
        let mut config = ReporterConfig::default();
        config.output.path = dir.path().to_path_buf();
        config.output.format = format;
        RecorderRegistry::new(config)
    }

    #[test]
    fn test_obtain_returns_same_recorder() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir, OutputFormat::Json);

        let first = registry.obtain_recorder("org.example.A#one");
        let second = registry.obtain_recorder("org.example.A#one");
        let other = registry.obtain_recorder("org.example.A#two");

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_concurrent_obtain_creates_once() {
        let dir = TempDir::new().unwrap();
        let registry = Arc::new(registry_in(&dir, OutputFormat::Xml));
        let barrier = Arc::new(Barrier::new(16));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    registry.obtain_recorder("shared#key")
                })
            })
            .collect();
        let recorders: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        for recorder in &recorders[1..] {
            assert!(Arc::ptr_eq(&recorders[0], recorder));
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_format_follows_config() {
        let dir = TempDir::new().unwrap();
        for format in [OutputFormat::Json, OutputFormat::Xml, OutputFormat::Html] {
            let registry = registry_in(&dir, format);
            assert_eq!(registry.obtain_recorder("k#m").output_format(), format);
        }
    }

    #[test]
    fn test_destination_per_key() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir, OutputFormat::Xml);

        let path = registry.destination_for("org.example.LoginTest#rejects");
        assert_eq!(path, dir.path().join("xmlRecordsorg.example.LoginTest#rejects.xml"));

        let escaped = registry.destination_for("../outside#x");
        assert_eq!(escaped.parent().unwrap(), dir.path());

        assert_ne!(
            registry.destination_for("pkg/Cart#add"),
            registry.destination_for("pkg_Cart#add")
        );
    }

    #[test]
    fn test_get_remove_contains() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir, OutputFormat::Json);

        assert!(registry.get_recorder("a#b").is_none());
        let created = registry.obtain_recorder("a#b");
        assert!(registry.contains_recorder("a#b"));
        assert!(Arc::ptr_eq(&registry.get_recorder("a#b").unwrap(), &created));

        let removed = registry.remove_recorder("a#b").unwrap();
        assert!(Arc::ptr_eq(&removed, &created));
        assert!(!registry.contains_recorder("a#b"));
        assert!(registry.remove_recorder("a#b").is_none());

        let fresh = registry.obtain_recorder("a#b");
        assert!(!Arc::ptr_eq(&fresh, &created));
    }

    #[test]
    fn test_all_recorders_is_a_copy() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir, OutputFormat::Json);
        registry.obtain_recorder("a#1");
        registry.obtain_recorder("a#2");

        let snapshot = registry.all_recorders();
        registry.clear_all_recorders();

        assert_eq!(snapshot.len(), 2);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_save_all_writes_each_recorder() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir, OutputFormat::Json);
        registry
            .obtain_recorder("suite.A#one")
            .add_record(Record::new("one", "A", RecordKind::Success, "passed"));
        registry
            .obtain_recorder("suite.B#two")
            .add_record(Record::new("two", "B", RecordKind::Error, "failed"));

        let outcomes = registry.save_all();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].0, "suite.A#one");
        for (_, outcome) in &outcomes {
            assert!(outcome.as_ref().unwrap().exists());
        }
    }

    #[test]
    fn test_global_is_shared() {
        let first = RecorderRegistry::global() as *const RecorderRegistry;
        let second = RecorderRegistry::global() as *const RecorderRegistry;
        assert_eq!(first, second);
    }
}
