//! Logger facade
//!
//! Producers call the per-level write methods from any thread; each call
//! captures a [`LogRecord`] and enqueues it without touching I/O. The worker
//! started by [`Logger::start`] does the formatting and writing.
//!
//! No write call, lifecycle call, or `Drop` ever returns an error or panics
//! because of a logging problem: failures are degraded, counted in
//! [`LoggerMetrics`], and reported on stderr.

use super::{
    config::{LoggerConfig, OutputMode},
    error::{LoggerError, Result},
    log_level::LogLevel,
    log_path::{application_name, log_file_name, resolve_log_directory},
    log_record::LogRecord,
    message::format_template,
    metrics::LoggerMetrics,
    queue::HandoffQueue,
    worker::{
        panic_message, BatchWorker, Pipeline, WorkerControl, WorkerState, DEFAULT_POLL_INTERVAL,
    },
};
use crate::sinks::{ConsoleSink, FileSink, RotationOutcome, Sink};
use chrono::Local;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default time `stop()` waits for the worker before abandoning it (5 seconds)
///
/// Also used when the logger is dropped while still running.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// How a call to [`Logger::stop`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// No worker was running
    NotRunning,
    /// The worker drained the queue and exited
    Graceful,
    /// The worker did not exit in time and was abandoned; queued records may be lost
    TimedOut,
    /// The worker thread panicked
    WorkerPanicked,
}

struct WorkerHandle {
    control: Arc<WorkerControl>,
    thread: thread::JoinHandle<()>,
}

/// Asynchronous logger with one background batch worker.
///
/// # Example
///
/// ```no_run
/// use rust_batch_logger::{Logger, OutputMode};
///
/// let logger = Logger::builder()
///     .log_directory("/var/log/myapp")
///     .output_mode(OutputMode::FileOnly)
///     .batch_size(100)
///     .build()
///     .unwrap();
///
/// logger.start();
/// logger.info("Server started");
/// logger.warning_fmt("Disk usage at {}%", &[&91]);
/// logger.stop();
/// ```
pub struct Logger {
    pipeline: Arc<Pipeline>,
    /// Built-in file sink, absent when a custom file sink was supplied
    file_sink: Option<Arc<FileSink>>,
    file_path: PathBuf,
    worker: Mutex<Option<WorkerHandle>>,
    /// Serializes `start` and `stop`; `worker` itself is only locked briefly
    lifecycle: Mutex<()>,
    /// Set once a worker was left behind by a timed-out stop
    abandoned: AtomicBool,
    shutdown_timeout: Duration,
    poll_interval: Duration,
}

impl Logger {
    /// Create a logger from `config` with the default sinks.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the log directory
    /// cannot be created.
    pub fn new(config: LoggerConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Enqueue a plain message.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.submit(LogRecord::new(level, message));
    }

    /// Enqueue a message rendered from `template` and `args` at runtime.
    ///
    /// A template that does not match its arguments is still logged, as the
    /// literal template followed by a `[FORMAT ERROR: ...]` marker. Placeholders
    /// use `format!` syntax; printf markers like `%s` are plain text.
    pub fn log_fmt(&self, level: LogLevel, template: &str, args: &[&dyn fmt::Display]) {
        let message = format_template(template, args);
        if message.is_degraded() {
            self.pipeline.metrics.record_format_error();
        }
        self.log(level, message.into_message());
    }

    fn submit(&self, record: LogRecord) {
        match self.pipeline.queue.enqueue(record) {
            Ok(()) => {
                self.pipeline.metrics.record_enqueued();
            }
            Err(_) => {
                // Stopped or stopping: late writes are refused, never blocked
                self.pipeline.metrics.record_rejected();
            }
        }
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warning(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn debug_fmt(&self, template: &str, args: &[&dyn fmt::Display]) {
        self.log_fmt(LogLevel::Debug, template, args);
    }

    #[inline]
    pub fn info_fmt(&self, template: &str, args: &[&dyn fmt::Display]) {
        self.log_fmt(LogLevel::Info, template, args);
    }

    #[inline]
    pub fn warning_fmt(&self, template: &str, args: &[&dyn fmt::Display]) {
        self.log_fmt(LogLevel::Warning, template, args);
    }

    #[inline]
    pub fn error_fmt(&self, template: &str, args: &[&dyn fmt::Display]) {
        self.log_fmt(LogLevel::Error, template, args);
    }

    /// Start the background worker.
    ///
    /// Idempotent: returns `false` without doing anything if a worker is
    /// already running. Records written before the first start are kept and
    /// flushed once the worker runs.
    pub fn start(&self) -> bool {
        let _lifecycle = self.lifecycle.lock();
        let mut worker = self.worker.lock();

        if let Some(handle) = worker.as_ref() {
            if !handle.thread.is_finished() {
                return false;
            }
            // Worker died on its own; reap it and start a fresh one
            if let Some(dead) = worker.take() {
                if let Err(e) = dead.thread.join() {
                    eprintln!(
                        "[LOGGER ERROR] Worker thread had panicked: {}",
                        panic_message(e.as_ref())
                    );
                }
            }
        }

        self.pipeline.queue.reopen();
        let control = Arc::new(WorkerControl::new());
        let batch_worker = BatchWorker::new(
            Arc::clone(&self.pipeline),
            Arc::clone(&control),
            self.poll_interval,
        );

        match thread::Builder::new()
            .name("batch-logger".to_string())
            .spawn(move || batch_worker.run())
        {
            Ok(thread) => {
                *worker = Some(WorkerHandle { control, thread });
                true
            }
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to spawn worker thread: {}", e);
                false
            }
        }
    }

    /// Stop the worker, waiting up to the configured shutdown timeout.
    pub fn stop(&self) -> StopOutcome {
        self.stop_with_timeout(self.shutdown_timeout)
    }

    /// Stop the worker, waiting at most `timeout` for it to drain.
    ///
    /// The queue is closed first, so writes racing with the stop are either
    /// drained or rejected. If the worker does not exit in time it is
    /// abandoned: its thread is detached and it skips the final drain.
    pub fn stop_with_timeout(&self, timeout: Duration) -> StopOutcome {
        let _lifecycle = self.lifecycle.lock();
        let Some(control) = self
            .worker
            .lock()
            .as_ref()
            .map(|handle| Arc::clone(&handle.control))
        else {
            return StopOutcome::NotRunning;
        };

        self.pipeline.queue.close();
        control.request_stop();

        let start = Instant::now();
        loop {
            let finished = self
                .worker
                .lock()
                .as_ref()
                .map_or(true, |handle| handle.thread.is_finished());

            if finished {
                let Some(handle) = self.worker.lock().take() else {
                    return StopOutcome::Graceful;
                };
                return match handle.thread.join() {
                    Ok(()) => StopOutcome::Graceful,
                    Err(e) => {
                        eprintln!(
                            "[LOGGER ERROR] Worker thread panicked during shutdown: {}",
                            panic_message(e.as_ref())
                        );
                        StopOutcome::WorkerPanicked
                    }
                };
            }

            if start.elapsed() >= timeout {
                control.abandon();
                self.abandoned.store(true, Ordering::Release);
                // Dropping the handle detaches the thread
                drop(self.worker.lock().take());
                eprintln!(
                    "[LOGGER WARNING] Worker thread did not finish within {:?}. \
                     Up to {} queued records may be lost.",
                    timeout,
                    self.pipeline.queue.count()
                );
                return StopOutcome::TimedOut;
            }

            // Small sleep to avoid busy-waiting
            thread::sleep(Duration::from_millis(5));
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.thread.is_finished())
    }

    /// State of the current worker, `Stopped` if none is running
    pub fn worker_state(&self) -> WorkerState {
        self.worker
            .lock()
            .as_ref()
            .map_or(WorkerState::Stopped, |handle| handle.control.state())
    }

    /// Number of records waiting in the queue (a snapshot)
    pub fn pending(&self) -> usize {
        self.pipeline.queue.count()
    }

    /// Path of the current log file
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Snapshot of the live configuration
    pub fn config(&self) -> LoggerConfig {
        self.pipeline.config.read().clone()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.pipeline.metrics
    }

    pub fn set_output_mode(&self, mode: OutputMode) {
        self.pipeline.config.write().output_mode = mode;
    }

    pub fn set_color_enabled(&self, enabled: bool) {
        self.pipeline.config.write().color_enabled = enabled;
    }

    pub fn set_auto_rotate(&self, enabled: bool) {
        self.pipeline.config.write().auto_rotate = enabled;
    }

    /// Change the rotation threshold; zero is ignored
    pub fn set_max_file_size(&self, bytes: u64) {
        if bytes == 0 {
            eprintln!("[LOGGER WARNING] Ignoring max file size of 0 bytes");
            return;
        }
        self.pipeline.config.write().max_file_size_bytes = bytes;
    }

    /// Change the batch size; zero is ignored
    pub fn set_batch_size(&self, size: usize) {
        if size == 0 {
            eprintln!("[LOGGER WARNING] Ignoring batch size of 0");
            return;
        }
        self.pipeline.config.write().batch_size = size;
    }

    /// Rotate the current log file now, regardless of its size.
    ///
    /// # Errors
    ///
    /// Returns an error if no log file exists yet, rotation fails, or the
    /// logger was built with a custom file sink.
    pub fn rotate_now(&self) -> Result<RotationOutcome> {
        match &self.file_sink {
            Some(sink) => sink.rotate_now(),
            None => Err(LoggerError::other(
                "manual rotation is only supported by the built-in file sink",
            )),
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        match self.stop() {
            StopOutcome::TimedOut | StopOutcome::WorkerPanicked => {}
            StopOutcome::NotRunning | StopOutcome::Graceful
                if self.abandoned.load(Ordering::Acquire) =>
            {
                // An abandoned worker may still be stuck inside a sink
                eprintln!(
                    "[LOGGER WARNING] Skipping final flush after forced shutdown; {} queued records dropped.",
                    self.pipeline.queue.count()
                );
            }
            StopOutcome::NotRunning | StopOutcome::Graceful => {
                // Never started, or records slipped in after the final drain
                if !self.pipeline.queue.is_empty() {
                    self.pipeline.drain_and_flush();
                }
                self.pipeline.flush_sinks();
            }
        }

        let metrics = &self.pipeline.metrics;
        if metrics.sink_errors() > 0 || metrics.rejected() > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down after {} sink errors and {} rejected records",
                metrics.sink_errors(),
                metrics.rejected()
            );
        }
    }
}

/// Builder for constructing a [`Logger`] with a fluent API
///
/// # Example
/// ```no_run
/// use rust_batch_logger::prelude::*;
/// use std::time::Duration;
///
/// let logger = Logger::builder()
///     .log_directory("LOGS")
///     .output_mode(OutputMode::Both)
///     .max_file_size(5 * 1024 * 1024)
///     .batch_size(20)
///     .color_enabled(false)
///     .shutdown_timeout(Duration::from_secs(2))
///     .build()
///     .unwrap();
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    app_name: Option<String>,
    shutdown_timeout: Duration,
    poll_interval: Duration,
    console_sink: Option<Arc<dyn Sink>>,
    file_sink: Option<Arc<dyn Sink>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            app_name: None,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            console_sink: None,
            file_sink: None,
        }
    }

    /// Replace the whole configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.log_directory = dir.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.config.output_mode = mode;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size_bytes = bytes;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn auto_rotate(mut self, enabled: bool) -> Self {
        self.config.auto_rotate = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn color_enabled(mut self, enabled: bool) -> Self {
        self.config.color_enabled = enabled;
        self
    }

    /// Base name of the log file; defaults to the executable's name
    #[must_use = "builder methods return a new value"]
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// How long the worker blocks on an empty queue before re-checking for stop
    #[must_use = "builder methods return a new value"]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Use a custom console sink instead of stdout
    #[must_use = "builder methods return a new value"]
    pub fn console_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.console_sink = Some(sink);
        self
    }

    /// Use a custom file sink instead of the rotating file writer
    #[must_use = "builder methods return a new value"]
    pub fn file_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.file_sink = Some(sink);
        self
    }

    /// Build the logger. The worker is not started.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the log directory
    /// cannot be created.
    pub fn build(self) -> Result<Logger> {
        let mut config = self.config;
        config.validate()?;
        if self.poll_interval.is_zero() {
            return Err(LoggerError::config(
                "LoggerBuilder",
                "poll_interval must be greater than zero",
            ));
        }

        let directory = resolve_log_directory(&config.log_directory)?;
        let app_name = self.app_name.unwrap_or_else(application_name);
        let file_path = directory.join(log_file_name(&app_name, &Local::now()));
        config.log_directory = directory;

        let metrics = Arc::new(LoggerMetrics::new());

        let (file, file_sink): (Arc<dyn Sink>, Option<Arc<FileSink>>) = match self.file_sink {
            Some(custom) => (custom, None),
            None => {
                let sink = Arc::new(FileSink::new(&file_path).with_metrics(Arc::clone(&metrics)));
                let file: Arc<dyn Sink> = sink.clone();
                (file, Some(sink))
            }
        };
        let console = self
            .console_sink
            .unwrap_or_else(|| Arc::new(ConsoleSink::new()));

        let pipeline = Arc::new(Pipeline {
            queue: HandoffQueue::new(),
            config: RwLock::new(config),
            console,
            file,
            metrics,
        });

        Ok(Logger {
            pipeline,
            file_sink,
            file_path,
            worker: Mutex::new(None),
            lifecycle: Mutex::new(()),
            abandoned: AtomicBool::new(false),
            shutdown_timeout: self.shutdown_timeout,
            poll_interval: self.poll_interval,
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
