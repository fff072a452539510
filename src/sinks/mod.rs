//! Sink implementations
//!
//! A sink receives whole batches of already formatted lines. Sinks take `&self`
//! and guard their own stream with a lock, so the worker and the facade (for
//! example [`Logger::rotate_now`](crate::Logger::rotate_now)) can share one.

pub mod console;
pub mod file;
pub mod rotation;

pub use console::ConsoleSink;
pub use file::FileSink;
pub use rotation::{RotationOutcome, RotationPolicy};

use crate::core::{LogLevel, LoggerConfig, Result};

/// One record after formatting, ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedRecord {
    pub level: LogLevel,
    /// Formatted line without trailing newline
    pub line: String,
}

impl FormattedRecord {
    pub fn new(level: LogLevel, line: impl Into<String>) -> Self {
        Self {
            level,
            line: line.into(),
        }
    }
}

/// Delivery target for formatted lines
pub trait Sink: Send + Sync {
    /// Write every line of `batch`, in order, as one unit.
    ///
    /// `config` is the worker's snapshot for this batch and carries runtime
    /// settings such as colors and rotation thresholds.
    fn write_batch(&self, batch: &[FormattedRecord], config: &LoggerConfig) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
