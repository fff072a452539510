//! Logger configuration
//!
//! [`LoggerConfig`] can be built in code, through [`LoggerBuilder`](super::LoggerBuilder),
//! or loaded from JSON. Missing JSON fields fall back to their defaults:
//!
//! ```
//! use rust_batch_logger::{LoggerConfig, OutputMode};
//!
//! let config = LoggerConfig::from_json_str(r#"{ "output_mode": "file_only", "batch_size": 10 }"#)
//!     .unwrap();
//! assert_eq!(config.output_mode, OutputMode::FileOnly);
//! assert_eq!(config.batch_size, 10);
//! assert!(config.auto_rotate);
//! ```

use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default log directory, resolved relative to the executable
pub const DEFAULT_LOG_DIRECTORY: &str = "LOGS";

/// Default rotation threshold (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default number of records flushed together
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Which sinks receive each flushed batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    ConsoleOnly,
    FileOnly,
    #[default]
    Both,
}

impl OutputMode {
    #[inline]
    pub fn writes_console(self) -> bool {
        matches!(self, OutputMode::ConsoleOnly | OutputMode::Both)
    }

    #[inline]
    pub fn writes_file(self) -> bool {
        matches!(self, OutputMode::FileOnly | OutputMode::Both)
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputMode::ConsoleOnly => "console_only",
            OutputMode::FileOnly => "file_only",
            OutputMode::Both => "both",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "console_only" | "console" => Ok(OutputMode::ConsoleOnly),
            "file_only" | "file" => Ok(OutputMode::FileOnly),
            "both" => Ok(OutputMode::Both),
            _ => Err(format!("Invalid output mode: '{}'", s)),
        }
    }
}

/// Settings shared by the facade and the batch worker.
///
/// The worker reads a fresh snapshot for every batch, so runtime changes take
/// effect from the next flush on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Directory holding the log file; relative paths are resolved against
    /// the executable's directory
    pub log_directory: PathBuf,
    pub output_mode: OutputMode,
    /// Size above which the current file is rotated before the next write
    pub max_file_size_bytes: u64,
    /// Maximum number of records flushed together
    pub batch_size: usize,
    pub auto_rotate: bool,
    pub color_enabled: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_directory: PathBuf::from(DEFAULT_LOG_DIRECTORY),
            output_mode: OutputMode::default(),
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            auto_rotate: true,
            color_enabled: true,
        }
    }
}

impl LoggerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or fails [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logger configuration",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json_str(&json)
    }

    /// Check the invariants the worker relies on.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] for a zero batch size or
    /// a zero size threshold.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "batch_size must be greater than zero",
            ));
        }
        if self.max_file_size_bytes == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "max_file_size_bytes must be greater than zero",
            ));
        }
        Ok(())
    }
}
