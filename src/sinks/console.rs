//! Console sink implementation

use super::{FormattedRecord, Sink};
use crate::core::{LogLevel, LoggerConfig, Result};
use colored::{ColoredString, Colorize};
use parking_lot::Mutex;
use std::io::{self, Write};

/// Writes one line per record, colored by level when enabled.
///
/// Defaults to stdout; [`ConsoleSink::with_writer`] redirects it, which is
/// mostly useful for capturing output.
pub struct ConsoleSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn paint(level: LogLevel, line: &str) -> ColoredString {
        match level {
            LogLevel::Debug => line.dimmed(),
            LogLevel::Info => line.green(),
            LogLevel::Warning => line.yellow(),
            LogLevel::Error => line.red(),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write_batch(&self, batch: &[FormattedRecord], config: &LoggerConfig) -> Result<()> {
        let mut writer = self.writer.lock();
        for record in batch {
            if config.color_enabled {
                writeln!(writer, "{}", Self::paint(record.level, &record.line))?;
            } else {
                writeln!(writer, "{}", record.line)?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
