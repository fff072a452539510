//! Background batch worker
//!
//! One worker thread per running [`Logger`](super::Logger). Each cycle it
//! waits briefly for a record, greedily pulls more without blocking until the
//! batch is full, formats the batch once, and hands it to the sinks selected by
//! the current [`OutputMode`](super::OutputMode).
//!
//! ```text
//! Idle -> Draining -> Flushing -> Idle ...
//!   stop requested: Stopping -> FinalDrain -> Stopped
//! ```
//!
//! A sink that fails or panics is reported on stderr and counted; the other
//! sink still receives the batch and the worker moves on to the next one.

use super::{
    error::LoggerError, formatter::format_line, log_record::LogRecord, metrics::LoggerMetrics,
    queue::HandoffQueue, LoggerConfig,
};
use crate::sinks::{FormattedRecord, Sink};
use parking_lot::RwLock;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How long a single blocking dequeue waits before the stop flag is re-checked
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    /// Waiting for the first record of a batch
    Idle = 0,
    /// Pulling further records into the current batch
    Draining = 1,
    Flushing = 2,
    Stopping = 3,
    FinalDrain = 4,
    Stopped = 5,
}

impl WorkerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => WorkerState::Idle,
            1 => WorkerState::Draining,
            2 => WorkerState::Flushing,
            3 => WorkerState::Stopping,
            4 => WorkerState::FinalDrain,
            _ => WorkerState::Stopped,
        }
    }
}

/// Flags shared between one worker thread and the facade that owns it
#[derive(Debug)]
pub struct WorkerControl {
    stop: AtomicBool,
    abandon: AtomicBool,
    state: AtomicU8,
}

impl WorkerControl {
    pub fn new() -> Self {
        Self {
            stop: AtomicBool::new(false),
            abandon: AtomicBool::new(false),
            state: AtomicU8::new(WorkerState::Idle as u8),
        }
    }

    /// Ask the worker to finish its cycle, drain the queue and exit
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Give up on the worker: it exits at its next check without a final drain
    pub fn abandon(&self) {
        self.abandon.store(true, Ordering::Release);
        self.request_stop();
    }

    pub fn is_abandoned(&self) -> bool {
        self.abandon.load(Ordering::Acquire)
    }

    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: WorkerState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

impl Default for WorkerControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the worker and the facade share
pub struct Pipeline {
    pub queue: HandoffQueue<LogRecord>,
    pub config: RwLock<LoggerConfig>,
    pub console: Arc<dyn Sink>,
    pub file: Arc<dyn Sink>,
    pub metrics: Arc<LoggerMetrics>,
}

impl Pipeline {
    /// Format `records` and deliver them to the sinks selected by the
    /// current configuration. Never fails; problems are reported and counted.
    pub fn flush_batch(&self, records: &[LogRecord]) {
        if records.is_empty() {
            return;
        }

        // One snapshot per batch: config changes apply from the next batch on
        let config = self.config.read().clone();
        let lines: Vec<FormattedRecord> = records
            .iter()
            .map(|record| FormattedRecord::new(record.level(), format_line(record)))
            .collect();

        let mut delivered = true;
        if config.output_mode.writes_console() {
            delivered &= self.deliver(self.console.as_ref(), &lines, &config);
        }
        if config.output_mode.writes_file() {
            delivered &= self.deliver(self.file.as_ref(), &lines, &config);
        }

        self.metrics.record_batch(records.len());
        if delivered {
            self.metrics.record_flushed(records.len());
        }
    }

    /// Flush everything currently queued, in chunks of at most `batch_size`.
    pub fn drain_and_flush(&self) -> usize {
        let remaining = self.queue.drain();
        let batch_size = self.config.read().batch_size.max(1);
        for chunk in remaining.chunks(batch_size) {
            self.flush_batch(chunk);
        }
        remaining.len()
    }

    /// Flush every sink, reporting failures
    pub fn flush_sinks(&self) {
        for sink in [&self.console, &self.file] {
            if let Err(e) = sink.flush() {
                eprintln!("[LOGGER ERROR] Sink '{}' flush failed: {}", sink.name(), e);
            }
        }
    }

    /// Per-sink panic isolation: a failing sink never stops the other one
    fn deliver(&self, sink: &dyn Sink, lines: &[FormattedRecord], config: &LoggerConfig) -> bool {
        match catch_unwind(AssertUnwindSafe(|| sink.write_batch(lines, config))) {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                self.metrics.record_sink_error();
                eprintln!(
                    "[LOGGER ERROR] Sink '{}' failed to write {} records: {}",
                    sink.name(),
                    lines.len(),
                    e
                );
                false
            }
            Err(panic_info) => {
                self.metrics.record_sink_error();
                let err = LoggerError::sink_panicked(sink.name(), panic_message(panic_info.as_ref()));
                eprintln!("[LOGGER CRITICAL] {}. Other sinks continue to function.", err);
                false
            }
        }
    }
}

/// Extract a readable message from a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

pub struct BatchWorker {
    pipeline: Arc<Pipeline>,
    control: Arc<WorkerControl>,
    poll_interval: Duration,
}

impl BatchWorker {
    pub fn new(pipeline: Arc<Pipeline>, control: Arc<WorkerControl>, poll_interval: Duration) -> Self {
        Self {
            pipeline,
            control,
            poll_interval,
        }
    }

    /// Worker loop; returns once stopped.
    pub fn run(self) {
        let queue = &self.pipeline.queue;
        let mut batch = Vec::new();

        while !self.control.stop_requested() {
            self.control.set_state(WorkerState::Idle);
            let Some(first) = queue.dequeue(self.poll_interval) else {
                continue;
            };

            self.control.set_state(WorkerState::Draining);
            let batch_size = self.pipeline.config.read().batch_size.max(1);
            batch.push(first);
            while batch.len() < batch_size {
                match queue.try_dequeue() {
                    Some(record) => batch.push(record),
                    None => break,
                }
            }

            self.control.set_state(WorkerState::Flushing);
            self.pipeline.flush_batch(&batch);
            batch.clear();
        }

        self.control.set_state(WorkerState::Stopping);
        if self.control.is_abandoned() {
            self.control.set_state(WorkerState::Stopped);
            return;
        }

        self.control.set_state(WorkerState::FinalDrain);
        self.pipeline.drain_and_flush();
        self.pipeline.flush_sinks();
        self.control.set_state(WorkerState::Stopped);
    }
}
