//! Size-based log rotation
//!
//! Before each physical write the file sink asks the [`RotationPolicy`]
//! whether the current file has grown past its threshold. If so the file is
//! renamed to the first free `<stem>_<N><ext>` name (N starting at 1) and a
//! fresh file takes its place. Existing backups are never overwritten.
//!
//! When the rename fails (the file is held open elsewhere, for instance) the
//! oversized file is deleted instead, so rotation never blocks logging.

use crate::core::error::{LoggerError, Result};
use crate::core::LoggerConfig;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// How a log file is moved to its backup name
pub(crate) type RenameFn = fn(&Path, &Path) -> io::Result<()>;

pub(crate) fn rename_file(from: &Path, to: &Path) -> io::Result<()> {
    fs::rename(from, to)
}

/// When to rotate
///
/// # Examples
///
/// ```
/// use rust_batch_logger::sinks::RotationPolicy;
///
/// let policy = RotationPolicy::new(100);
/// assert!(!policy.should_rotate(100));
/// assert!(policy.should_rotate(101));
///
/// let disabled = policy.with_auto_rotate(false);
/// assert!(!disabled.should_rotate(u64::MAX));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub auto_rotate: bool,
    pub max_file_size_bytes: u64,
}

impl RotationPolicy {
    #[must_use]
    pub fn new(max_file_size_bytes: u64) -> Self {
        Self {
            auto_rotate: true,
            max_file_size_bytes,
        }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_auto_rotate(mut self, enabled: bool) -> Self {
        self.auto_rotate = enabled;
        self
    }

    #[must_use]
    pub fn from_config(config: &LoggerConfig) -> Self {
        Self {
            auto_rotate: config.auto_rotate,
            max_file_size_bytes: config.max_file_size_bytes,
        }
    }

    /// A file is rotated once its size strictly exceeds the threshold.
    #[must_use]
    pub fn should_rotate(&self, current_size: u64) -> bool {
        self.auto_rotate && current_size > self.max_file_size_bytes
    }
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self::from_config(&LoggerConfig::default())
    }
}

/// What happened to the oversized file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationOutcome {
    /// Renamed to this backup path
    Renamed(PathBuf),
    /// Rename failed, the file was deleted instead
    Deleted,
}

/// `<stem>_<index><ext>` next to `path`.
#[must_use]
pub fn backup_path(path: &Path, index: u32) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "app".to_string());
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}_{}", stem, index),
    };
    path.with_file_name(name)
}

/// Lowest-numbered backup path that does not exist yet.
#[must_use]
pub fn next_backup_path(path: &Path) -> PathBuf {
    let mut index = 1;
    loop {
        let candidate = backup_path(path, index);
        if !candidate.exists() {
            return candidate;
        }
        index += 1;
    }
}

/// Move `path` aside, falling back to deleting it.
///
/// The caller must have released any handle on `path` and is responsible for
/// creating the replacement file.
///
/// # Errors
///
/// Returns an error only if both the rename and the delete fail.
pub fn rotate_file(path: &Path) -> Result<RotationOutcome> {
    rotate_with(path, rename_file)
}

pub(crate) fn rotate_with(path: &Path, rename: RenameFn) -> Result<RotationOutcome> {
    let backup = next_backup_path(path);
    match rename(path, &backup) {
        Ok(()) => Ok(RotationOutcome::Renamed(backup)),
        Err(rename_err) => {
            eprintln!(
                "[LOGGER WARNING] Failed to rename {} to {}: {}. Deleting oversized log file.",
                path.display(),
                backup.display(),
                rename_err
            );
            fs::remove_file(path).map_err(|e| {
                LoggerError::file_rotation(
                    path.display().to_string(),
                    format!("rename failed ({}) and delete failed ({})", rename_err, e),
                )
            })?;
            Ok(RotationOutcome::Deleted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_policy_threshold_is_exclusive() {
        let policy = RotationPolicy::new(100);
        assert!(!policy.should_rotate(0));
        assert!(!policy.should_rotate(100));
        assert!(policy.should_rotate(101));
    }

    #[test]
    fn test_policy_from_config() {
        let config = LoggerConfig {
            auto_rotate: false,
            max_file_size_bytes: 42,
            ..LoggerConfig::default()
        };
        let policy = RotationPolicy::from_config(&config);
        assert_eq!(policy, RotationPolicy::new(42).with_auto_rotate(false));
        assert!(!policy.should_rotate(1000));
    }

    #[test]
    fn test_backup_path_naming() {
        let path = Path::new("/var/log/server_2024-03-09_07-05-01.log");
        assert_eq!(
            backup_path(path, 1),
            PathBuf::from("/var/log/server_2024-03-09_07-05-01_1.log")
        );
        assert_eq!(
            backup_path(Path::new("/var/log/plain"), 3),
            PathBuf::from("/var/log/plain_3")
        );
    }

    #[test]
    fn test_next_backup_skips_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(backup_path(&path, 1), "old").unwrap();
        fs::write(backup_path(&path, 2), "older").unwrap();

        assert_eq!(next_backup_path(&path), dir.path().join("app_3.log"));
    }

    #[test]
    fn test_rotate_file_renames_without_overwriting() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");

        fs::write(&path, "first").unwrap();
        assert_eq!(
            rotate_file(&path).unwrap(),
            RotationOutcome::Renamed(dir.path().join("app_1.log"))
        );

        fs::write(&path, "second").unwrap();
        assert_eq!(
            rotate_file(&path).unwrap(),
            RotationOutcome::Renamed(dir.path().join("app_2.log"))
        );

        assert!(!path.exists());
        assert_eq!(fs::read_to_string(dir.path().join("app_1.log")).unwrap(), "first");
        assert_eq!(fs::read_to_string(dir.path().join("app_2.log")).unwrap(), "second");
    }

    fn locked_rename(_from: &Path, _to: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "file in use"))
    }

    #[test]
    fn test_rotate_deletes_when_rename_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "oversized").unwrap();

        assert_eq!(rotate_with(&path, locked_rename).unwrap(), RotationOutcome::Deleted);
        assert!(!path.exists());
        assert!(!backup_path(&path, 1).exists());
    }

    #[test]
    fn test_rotate_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let result = rotate_file(&dir.path().join("missing.log"));
        assert!(matches!(result, Err(LoggerError::FileRotationError { .. })));
    }
}
