//! Core logger types: records, queue, worker and facade

pub mod config;
pub mod error;
pub mod formatter;
pub mod log_level;
pub mod log_path;
pub mod log_record;
pub mod logger;
pub mod message;
pub mod metrics;
pub mod queue;
pub mod worker;

pub use config::{
    LoggerConfig, OutputMode, DEFAULT_BATCH_SIZE, DEFAULT_LOG_DIRECTORY, DEFAULT_MAX_FILE_SIZE,
};
pub use error::{LoggerError, Result};
pub use formatter::format_line;
pub use log_level::LogLevel;
pub use log_record::{current_thread_id, LogRecord};
pub use logger::{Logger, LoggerBuilder, StopOutcome, DEFAULT_SHUTDOWN_TIMEOUT};
pub use message::{format_template, FormattedMessage};
pub use metrics::LoggerMetrics;
pub use queue::HandoffQueue;
pub use worker::{WorkerState, DEFAULT_POLL_INTERVAL};
