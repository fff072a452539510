//! Log record structure

use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

// Per-thread cache so the id is assigned once per OS thread
thread_local! {
    static THREAD_ID_CACHE: Cell<u64> = const { Cell::new(0) };
}

/// Process-unique integer id of the calling thread.
///
/// Ids are handed out on first use, starting at 1, and stay stable for the
/// lifetime of the thread.
pub fn current_thread_id() -> u64 {
    THREAD_ID_CACHE.with(|cache| {
        let cached = cache.get();
        if cached != 0 {
            return cached;
        }
        let id = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
        cache.set(id);
        id
    })
}

/// One leveled, timestamped message awaiting delivery.
///
/// Immutable once built: fields are private and only exposed by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    timestamp: DateTime<Local>,
    level: LogLevel,
    message: String,
    thread_id: u64,
}

impl LogRecord {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so that a single record always renders as a single line.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    /// Capture a record on the calling thread, stamped with the current time.
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self::from_parts(Local::now(), level, message, current_thread_id())
    }

    pub fn from_parts(
        timestamp: DateTime<Local>,
        level: LogLevel,
        message: impl Into<String>,
        thread_id: u64,
    ) -> Self {
        let message = message.into();
        Self {
            timestamp,
            level,
            message: Self::sanitize_message(&message),
            thread_id,
        }
    }

    pub fn timestamp(&self) -> &DateTime<Local> {
        &self.timestamp
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn thread_id(&self) -> u64 {
        self.thread_id
    }
}
