//! Record formatting
//!
//! Turns a [`LogRecord`] into its text line:
//!
//! ```text
//! [2025-01-08 10:30:45.123] [INFO ] [TID:3] Application started
//! ```

use super::log_record::LogRecord;
use std::fmt::Write;

/// strftime pattern used for the bracketed line timestamp
pub const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Format a record as one line, without the trailing newline.
#[must_use]
pub fn format_line(record: &LogRecord) -> String {
    let mut line = String::with_capacity(48 + record.message().len());
    // Writing into a String cannot fail
    let _ = write!(
        line,
        "[{}] [{:<5}] [TID:{}] {}",
        record.timestamp().format(LINE_TIMESTAMP_FORMAT),
        record.level(),
        record.thread_id(),
        record.message()
    );
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;
    use chrono::{Local, TimeZone};

    fn at(ms: u32) -> chrono::DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .unwrap()
            + chrono::Duration::milliseconds(i64::from(ms))
    }

    #[test]
    fn test_line_layout() {
        let record = LogRecord::from_parts(at(123), LogLevel::Info, "Application started", 3);
        assert_eq!(
            format_line(&record),
            "[2025-01-08 10:30:45.123] [INFO ] [TID:3] Application started"
        );
    }

    #[test]
    fn test_level_padding() {
        let debug = LogRecord::from_parts(at(7), LogLevel::Debug, "d", 1);
        let warning = LogRecord::from_parts(at(7), LogLevel::Warning, "w", 1);

        assert_eq!(format_line(&debug), "[2025-01-08 10:30:45.007] [DEBUG] [TID:1] d");
        assert_eq!(format_line(&warning), "[2025-01-08 10:30:45.007] [WARNING] [TID:1] w");
    }
}
