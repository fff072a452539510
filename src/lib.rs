//! # Rust Batch Logger
//!
//! An in-process, asynchronous logging pipeline. Application threads submit
//! leveled records without blocking on I/O; one background worker per logger
//! drains them in batches, formats them, and writes them to the console and/or
//! a size-rotated log file.
//!
//! ## Features
//!
//! - **Non-blocking writes**: producers only touch an in-memory queue
//! - **Batched I/O**: one file write per batch, bursts coalesced automatically
//! - **Rotation**: the log file is moved aside to `<name>_<N>.log` once it
//!   exceeds the configured size
//! - **Clean shutdown**: `stop()` drains every queued record, with a bounded wait
//! - **Never throws**: logging problems are degraded, counted and reported,
//!   never propagated to the caller
//!
//! ```no_run
//! use rust_batch_logger::prelude::*;
//!
//! let logger = Logger::builder()
//!     .output_mode(OutputMode::Both)
//!     .build()
//!     .unwrap();
//! logger.start();
//!
//! logger.info("Application started");
//! logger.error_fmt("Request {} failed with status {}", &[&"GET /", &503]);
//!
//! logger.stop();
//! ```

pub mod bridge;
pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, OutputMode,
        Result, StopOutcome, WorkerState, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::sinks::{ConsoleSink, FileSink, FormattedRecord, Sink};
}

pub use bridge::LogBridge;
pub use core::{
    format_template, FormattedMessage, HandoffQueue, LogLevel, LogRecord, Logger, LoggerBuilder,
    LoggerConfig, LoggerError, LoggerMetrics, OutputMode, Result, StopOutcome, WorkerState,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use sinks::{ConsoleSink, FileSink, FormattedRecord, RotationOutcome, RotationPolicy, Sink};
