//! Log directory resolution and log file naming

use super::error::{LoggerError, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// strftime pattern for the construction timestamp in log file names
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

const FALLBACK_APP_NAME: &str = "app";

/// Directory of the running executable, if it can be determined.
fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

/// Base name of the running executable, or `app`.
pub fn application_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_APP_NAME.to_string())
}

/// Resolve `dir` and make sure it exists.
///
/// Absolute paths are used as given; relative paths are taken relative to the
/// executable's directory (or the working directory if that is unknown).
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn resolve_log_directory(dir: &Path) -> Result<PathBuf> {
    let resolved = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        match executable_dir() {
            Some(base) => base.join(dir),
            None => dir.to_path_buf(),
        }
    };

    fs::create_dir_all(&resolved).map_err(|e| {
        LoggerError::io_operation(
            "creating log directory",
            format!("Failed to create directory '{}'", resolved.display()),
            e,
        )
    })?;

    Ok(resolved)
}

/// `<app>_<yyyy-mm-dd_hh-mm-ss>.log`
#[must_use]
pub fn log_file_name(app_name: &str, created_at: &DateTime<Local>) -> String {
    format!("{}_{}.log", app_name, created_at.format(FILE_TIMESTAMP_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_log_file_name() {
        let created_at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).single().unwrap();
        assert_eq!(
            log_file_name("server", &created_at),
            "server_2024-03-09_07-05-01.log"
        );
    }

    #[test]
    fn test_absolute_directory_is_created() {
        let temp = tempfile::tempdir().unwrap();
        let target = temp.path().join("nested").join("logs");

        let resolved = resolve_log_directory(&target).unwrap();
        assert_eq!(resolved, target);
        assert!(target.is_dir());
    }

    #[test]
    fn test_relative_directory_is_anchored_to_executable() {
        let resolved = resolve_log_directory(Path::new("rust_batch_logger_test_logs")).unwrap();
        assert!(resolved.is_absolute() || executable_dir().is_none());
        assert!(resolved.ends_with("rust_batch_logger_test_logs"));
        let _ = fs::remove_dir(&resolved);
    }

    #[test]
    fn test_application_name_is_not_empty() {
        assert!(!application_name().is_empty());
    }
}
