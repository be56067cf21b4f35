// src/recording/storage.rs
//! Report destinations on the file system
//!
//! Writes are one-shot: every save produces a complete file. With append
//! mode on and the destination already present, the document goes to a
//! dated sibling named after the session instead of being byte-appended,
//! so earlier reports stay intact.

use crate::utils::errors::{ReporterError, Result};
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write as _};
use std::iter;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

/// Where a recorder writes its documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    path: PathBuf,
    append_mode: bool,
}

impl Destination {
    pub fn new(path: impl Into<PathBuf>, append_mode: bool) -> Self {
        Self {
            path: path.into(),
            append_mode,
        }
    }

    /// Primary file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append_mode(&self) -> bool {
        self.append_mode
    }

    /// Paths tried in order by an append-mode write: the primary, the dated
    /// session sibling, then numbered variants of it
    fn candidates(&self, session_id: &str) -> impl Iterator<Item = PathBuf> {
        let base = format!(
            "{}{}_{}",
            self.path.display(),
            chrono::Local::now().format("%Y-%m-%d"),
            session_id
        );

        iter::once(self.path.clone())
            .chain(iter::once(PathBuf::from(&base)))
            .chain((1..=u32::MAX).map(move |n| PathBuf::from(format!("{base}_{n}"))))
    }

    /// Write `content`, creating parent directories first. Returns the path
    /// actually written.
    ///
    /// In append mode every candidate is created exclusively, so concurrent
    /// writers never land on the same file.
    pub fn write(&self, session_id: &str, content: &str) -> Result<PathBuf> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ReporterError::storage(parent, e))?;
        }

        if !self.append_mode {
            fs::write(&self.path, content).map_err(|e| ReporterError::storage(&self.path, e))?;
            debug!("Wrote {} bytes to {}", content.len(), self.path.display());
            return Ok(self.path.clone());
        }

        for target in self.candidates(session_id) {
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&target) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(ReporterError::storage(&target, e)),
            };

            if target != self.path {
                warn!(
                    "Destination {} exists, writing report to {}",
                    self.path.display(),
                    target.display()
                );
            }
            file.write_all(content.as_bytes())
                .map_err(|e| ReporterError::storage(&target, e))?;
            debug!("Wrote {} bytes to {}", content.len(), target.display());

            return Ok(target);
        }

        Err(ReporterError::storage(
            &self.path,
            io::Error::new(ErrorKind::AlreadyExists, "no free report file name left"),
        ))
    }
}

/// Replace characters that would let a session key leave the output
/// directory or produce an invalid file name
///
/// When anything was replaced, an 8-digit hash of the raw key is appended so
/// that distinct keys never share a file.
pub fn sanitize_file_component(key: &str) -> String {
    let sanitized = key
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .replace("..", "__");

    if sanitized == key {
        return sanitized;
    }
    format!("{sanitized}-{:08x}", xxh3_64(key.as_bytes()) & 0xFFFF_FFFF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/report.json");
        let destination = Destination::new(&path, false);

        let written = destination.write("s1", "{}").unwrap();
        assert_eq!(written, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_overwrite_without_append() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.xml");
        let destination = Destination::new(&path, false);

        destination.write("s1", "first").unwrap();
        let written = destination.write("s1", "second").unwrap();

        assert_eq!(written, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_append_mode_fans_out() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.html");
        let destination = Destination::new(&path, true);

        let first = destination.write("sess", "one").unwrap();
        let second = destination.write("sess", "two").unwrap();
        let third = destination.write("sess", "three").unwrap();

        assert_eq!(first, path);
        assert_ne!(second, first);
        assert_ne!(third, second);
        assert!(second.to_string_lossy().ends_with("_sess"));
        assert!(third.to_string_lossy().ends_with("_sess_1"));

        assert_eq!(fs::read_to_string(&first).unwrap(), "one");
        assert_eq!(fs::read_to_string(&second).unwrap(), "two");
        assert_eq!(fs::read_to_string(&third).unwrap(), "three");
    }

    #[test]
    fn test_write_failure_reports_path() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        // Parent is a regular file, so the directory cannot be created
        let destination = Destination::new(blocker.join("report.json"), false);
        let err = destination.write("s", "{}").unwrap_err();
        assert!(matches!(err, ReporterError::StorageFailed { .. }));
    }

    #[test]
    fn test_append_mode_concurrent_writers_get_distinct_files() {
        const WRITERS: usize = 8;

        for primary_exists in [false, true] {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("report.json");
            if primary_exists {
                fs::write(&path, "earlier").unwrap();
            }
            let destination = Arc::new(Destination::new(&path, true));
            let barrier = Arc::new(Barrier::new(WRITERS));

            let handles: Vec<_> = (0..WRITERS)
                .map(|i| {
                    let destination = Arc::clone(&destination);
                    let barrier = Arc::clone(&barrier);
                    thread::spawn(move || {
                        barrier.wait();
                        destination.write("sess", &format!("doc{i}")).unwrap()
                    })
                })
                .collect();

            let written: HashSet<PathBuf> =
                handles.into_iter().map(|h| h.join().unwrap()).collect();
            assert_eq!(written.len(), WRITERS);

            let contents: HashSet<String> = written
                .iter()
                .map(|p| fs::read_to_string(p).unwrap())
                .collect();
            assert_eq!(contents.len(), WRITERS);

            let expected_files = WRITERS + usize::from(primary_exists);
            assert_eq!(fs::read_dir(dir.path()).unwrap().count(), expected_files);
            if primary_exists {
                assert_eq!(fs::read_to_string(&path).unwrap(), "earlier");
            }
        }
    }

    #[test]
    fn test_sanitize_file_component() {
        assert_eq!(sanitize_file_component("org.example.A#b"), "org.example.A#b");

        let escaped = sanitize_file_component("../../etc/passwd");
        assert!(escaped.starts_with("______etc_passwd-"));
        assert!(!escaped.contains('/'));
        assert!(!escaped.contains(".."));

        let windows = sanitize_file_component("a\\b:c");
        assert!(windows.starts_with("a_b_c-"));
        assert_eq!(windows.len(), "a_b_c-".len() + 8);
    }

    #[test]
    fn test_sanitized_keys_do_not_collide() {
        let slashed = sanitize_file_component("a/b#c");
        let plain = sanitize_file_component("a_b#c");

        assert_eq!(plain, "a_b#c");
        assert_ne!(slashed, plain);
        assert_eq!(slashed, sanitize_file_component("a/b#c"));
    }
}
