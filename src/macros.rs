//! Logging macros for ergonomic log message formatting.
//!
//! These format with `format!`, so placeholders and arguments are checked at
//! compile time. For templates only known at runtime use the `*_fmt` methods
//! on [`Logger`](crate::Logger).
//!
//! # Examples
//!
//! ```no_run
//! use rust_batch_logger::prelude::*;
//! use rust_batch_logger::info;
//!
//! let logger = Logger::new(LoggerConfig::default()).unwrap();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```no_run
/// # use rust_batch_logger::prelude::*;
/// # let logger = Logger::new(LoggerConfig::default()).unwrap();
/// use rust_batch_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```no_run
/// # use rust_batch_logger::prelude::*;
/// # let logger = Logger::new(LoggerConfig::default()).unwrap();
/// use rust_batch_logger::warning;
/// warning!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}
