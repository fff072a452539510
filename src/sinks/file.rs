//! File sink
//!
//! Appends each batch to the current log file with a single write. The size
//! check, any rotation it triggers, and the write all happen under one stream
//! lock, so a rotation can never split a batch.

use super::rotation::{self, RenameFn, RotationOutcome, RotationPolicy};
use super::{FormattedRecord, Sink};
use crate::core::{LoggerConfig, LoggerError, LoggerMetrics, Result};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct FileSink {
    path: PathBuf,
    /// Open handle on `path`; `None` until first write or after rotation failure
    stream: Mutex<Option<File>>,
    metrics: Option<Arc<LoggerMetrics>>,
    rename: RenameFn,
}

impl FileSink {
    /// Create a sink for `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            stream: Mutex::new(None),
            metrics: None,
            rename: rotation::rename_file,
        }
    }

    /// Count rotations in `metrics`
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<LoggerMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    #[cfg(test)]
    fn with_rename(mut self, rename: RenameFn) -> Self {
        self.rename = rename;
        self
    }

    /// Path of the current log file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the current log file on disk, 0 if it does not exist yet
    pub fn current_size(&self) -> u64 {
        let _stream = self.stream.lock();
        self.size_on_disk()
    }

    /// Rotate the current file regardless of its size.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can be neither renamed nor deleted, or
    /// the replacement cannot be created.
    pub fn rotate_now(&self) -> Result<RotationOutcome> {
        let mut stream = self.stream.lock();
        if !self.path.exists() {
            return Err(LoggerError::file_rotation(
                self.path.display().to_string(),
                "nothing to rotate, log file does not exist",
            ));
        }
        self.rotate_locked(&mut stream)
    }

    /// Append `bytes` to the current file, rotating first if `policy` says so.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written.
    pub fn write_bytes(&self, bytes: &[u8], policy: RotationPolicy) -> Result<()> {
        let mut stream = self.stream.lock();

        let size = self.size_on_disk();
        if size == 0 && !self.path.exists() {
            // Deleted behind our back; reopen below recreates it
            *stream = None;
        } else if policy.should_rotate(size) {
            if let Err(e) = self.rotate_locked(&mut stream) {
                eprintln!(
                    "[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.",
                    e
                );
            }
        }

        if stream.is_none() {
            *stream = Some(self.open()?);
        }
        let file = stream.as_mut().ok_or_else(|| {
            LoggerError::file_sink(self.path.display().to_string(), "File writer not initialized")
        })?;

        file.write_all(bytes).map_err(|e| {
            LoggerError::file_sink(
                self.path.display().to_string(),
                format!("Failed to write batch: {}", e),
            )
        })?;
        Ok(())
    }

    fn size_on_disk(&self) -> u64 {
        fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    fn open(&self) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                LoggerError::file_sink(
                    self.path.display().to_string(),
                    format!("Failed to open: {}", e),
                )
            })
    }

    fn rotate_locked(&self, stream: &mut Option<File>) -> Result<RotationOutcome> {
        // Release the handle so the rename can succeed on every platform
        if let Some(mut file) = stream.take() {
            let _ = file.flush();
        }

        let outcome = rotation::rotate_with(&self.path, self.rename)?;
        *stream = Some(self.open()?);

        if let Some(metrics) = &self.metrics {
            metrics.record_rotation();
        }
        Ok(outcome)
    }
}

impl Sink for FileSink {
    fn write_batch(&self, batch: &[FormattedRecord], config: &LoggerConfig) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let capacity = batch.iter().map(|r| r.line.len() + 1).sum();
        let mut buffer = String::with_capacity(capacity);
        for record in batch {
            buffer.push_str(&record.line);
            buffer.push('\n');
        }

        self.write_bytes(buffer.as_bytes(), RotationPolicy::from_config(config))
    }

    fn flush(&self) -> Result<()> {
        if let Some(file) = self.stream.lock().as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if let Some(mut file) = self.stream.get_mut().take() {
            let _ = file.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use tempfile::tempdir;

    fn batch(lines: &[&str]) -> Vec<FormattedRecord> {
        lines
            .iter()
            .map(|line| FormattedRecord::new(LogLevel::Info, *line))
            .collect()
    }

    #[test]
    fn test_file_created_on_first_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let sink = FileSink::new(&path);

        assert!(!path.exists());
        assert_eq!(sink.current_size(), 0);

        sink.write_batch(&batch(&["one", "two"]), &LoggerConfig::default())
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
        assert_eq!(sink.current_size(), 8);
    }

    #[test]
    fn test_rotation_before_next_batch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let metrics = Arc::new(LoggerMetrics::new());
        let sink = FileSink::new(&path).with_metrics(Arc::clone(&metrics));
        let config = LoggerConfig {
            max_file_size_bytes: 100,
            ..LoggerConfig::default()
        };

        let long = "x".repeat(120);
        sink.write_batch(&batch(&[long.as_str()]), &config).unwrap();
        // Oversized batch lands whole in the current file
        assert!(!dir.path().join("app_1.log").exists());

        sink.write_batch(&batch(&["after first rotation"]), &config).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("app_1.log")).unwrap(),
            format!("{}\n", long)
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "after first rotation\n");

        sink.write_batch(&batch(&[long.as_str()]), &config).unwrap();
        sink.write_batch(&batch(&["after second rotation"]), &config).unwrap();

        assert!(dir.path().join("app_2.log").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("app_1.log")).unwrap(),
            format!("{}\n", long)
        );
        assert_eq!(metrics.rotations(), 2);
    }

    #[test]
    fn test_rotation_falls_back_to_delete() {
        fn locked_rename(_from: &Path, _to: &Path) -> std::io::Result<()> {
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "file in use",
            ))
        }

        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let metrics = Arc::new(LoggerMetrics::new());
        let sink = FileSink::new(&path)
            .with_metrics(Arc::clone(&metrics))
            .with_rename(locked_rename);
        let config = LoggerConfig {
            max_file_size_bytes: 100,
            ..LoggerConfig::default()
        };

        sink.write_batch(&batch(&["x".repeat(120).as_str()]), &config).unwrap();
        sink.write_batch(&batch(&["kept", "batch"]), &config).unwrap();

        // Oversized content is gone, the batch lands in a recreated file
        assert!(!dir.path().join("app_1.log").exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "kept\nbatch\n");
        assert_eq!(metrics.rotations(), 1);
    }

    #[test]
    fn test_no_rotation_when_disabled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let sink = FileSink::new(&path);
        let config = LoggerConfig {
            max_file_size_bytes: 10,
            auto_rotate: false,
            ..LoggerConfig::default()
        };

        for _ in 0..5 {
            sink.write_batch(&batch(&["well past the limit"]), &config).unwrap();
        }

        assert!(!dir.path().join("app_1.log").exists());
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 5);
    }

    #[test]
    fn test_rotate_now() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let sink = FileSink::new(&path);

        assert!(sink.rotate_now().is_err());

        sink.write_batch(&batch(&["before"]), &LoggerConfig::default()).unwrap();
        let outcome = sink.rotate_now().unwrap();
        assert_eq!(outcome, RotationOutcome::Renamed(dir.path().join("app_1.log")));

        // A fresh empty file replaces the rotated one
        assert!(path.exists());
        assert_eq!(sink.current_size(), 0);

        sink.write_batch(&batch(&["after"]), &LoggerConfig::default()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "after\n");
    }

    #[test]
    fn test_recreates_file_deleted_externally() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let sink = FileSink::new(&path);

        sink.write_batch(&batch(&["first"]), &LoggerConfig::default()).unwrap();
        fs::remove_file(&path).unwrap();
        sink.write_batch(&batch(&["second"]), &LoggerConfig::default()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");
    }

    #[test]
    fn test_unwritable_directory_reports_error() {
        let dir = tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("missing").join("app.log"));

        let err = sink
            .write_batch(&batch(&["lost"]), &LoggerConfig::default())
            .unwrap_err();
        assert!(matches!(err, LoggerError::FileSinkError { .. }));
    }
}
