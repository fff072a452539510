//! Bridge from the [`log`] facade
//!
//! Lets libraries that log through `log::info!` and friends feed the same
//! pipeline. The host still owns the [`Logger`]: it builds it, installs the
//! bridge once, and stops the logger explicitly at exit.
//!
//! ```no_run
//! use rust_batch_logger::{LogBridge, Logger, LoggerConfig};
//! use std::sync::Arc;
//!
//! let logger = Arc::new(Logger::new(LoggerConfig::default()).unwrap());
//! logger.start();
//! LogBridge::install(Arc::clone(&logger)).unwrap();
//!
//! log::info!("routed through the batch worker");
//! logger.stop();
//! ```

use crate::core::{LogLevel, Logger, LoggerError, Result};
use std::sync::Arc;

pub struct LogBridge {
    logger: Arc<Logger>,
}

impl LogBridge {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    /// Install as the process-wide `log` logger, passing every level through.
    ///
    /// # Errors
    ///
    /// Returns an error if another `log` logger is already installed.
    pub fn install(logger: Arc<Logger>) -> Result<()> {
        log::set_boxed_logger(Box::new(Self::new(logger)))
            .map_err(|e| LoggerError::other(format!("Failed to install log bridge: {}", e)))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        self.logger
            .log(LogLevel::from(record.level()), record.args().to_string());
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LoggerConfig, OutputMode, Result as LoggerResult};
    use crate::sinks::{FormattedRecord, Sink};
    use log::Log;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct MemorySink {
        lines: Mutex<Vec<String>>,
    }

    impl Sink for MemorySink {
        fn write_batch(&self, batch: &[FormattedRecord], _config: &LoggerConfig) -> LoggerResult<()> {
            self.lines
                .lock()
                .extend(batch.iter().map(|r| r.line.clone()));
            Ok(())
        }

        fn name(&self) -> &str {
            "memory"
        }
    }

    #[test]
    fn test_log_records_are_routed() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(MemorySink::default());
        let logger = Arc::new(
            Logger::builder()
                .log_directory(dir.path())
                .output_mode(OutputMode::ConsoleOnly)
                .console_sink(sink.clone())
                .build()
                .unwrap(),
        );
        let bridge = LogBridge::new(Arc::clone(&logger));

        bridge.log(
            &log::Record::builder()
                .level(log::Level::Trace)
                .args(format_args!("traced {}", 1))
                .build(),
        );
        bridge.log(
            &log::Record::builder()
                .level(log::Level::Warn)
                .args(format_args!("warned"))
                .build(),
        );

        logger.start();
        logger.stop();

        let lines = sink.lines.lock();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[DEBUG]") && lines[0].ends_with("traced 1"));
        assert!(lines[1].contains("[WARNING]") && lines[1].ends_with("warned"));
    }
}
