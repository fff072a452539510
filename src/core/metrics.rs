//! Logger metrics for observability
//!
//! Counters describing what the pipeline did: records accepted and rejected,
//! batches flushed, sink failures and rotations.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use rust_batch_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_enqueued();
/// metrics.record_batch(1);
/// metrics.record_flushed(1);
///
/// assert_eq!(metrics.enqueued(), 1);
/// assert_eq!(metrics.flushed(), 1);
/// assert_eq!(metrics.batches(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records accepted onto the queue
    enqueued: AtomicU64,

    /// Records refused because the logger was stopping or stopped
    rejected: AtomicU64,

    /// Records handed to every sink selected for their batch
    flushed: AtomicU64,

    /// Number of batches flushed by the worker
    batches: AtomicU64,

    /// Size of the largest batch seen so far
    largest_batch: AtomicU64,

    /// Sink writes that failed or panicked
    sink_errors: AtomicU64,

    /// Completed file rotations
    rotations: AtomicU64,

    /// Templated writes whose template could not be rendered
    format_errors: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            flushed: AtomicU64::new(0),
            batches: AtomicU64::new(0),
            largest_batch: AtomicU64::new(0),
            sink_errors: AtomicU64::new(0),
            rotations: AtomicU64::new(0),
            format_errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flushed(&self) -> u64 {
        self.flushed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn batches(&self) -> u64 {
        self.batches.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn largest_batch(&self) -> u64 {
        self.largest_batch.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_errors(&self) -> u64 {
        self.sink_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rotations(&self) -> u64 {
        self.rotations.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn format_errors(&self) -> u64 {
        self.format_errors.load(Ordering::Relaxed)
    }

    /// Record an accepted write, returning the previous count
    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.rejected.fetch_add(1, Ordering::Relaxed)
    }

    /// Record one worker flush cycle of `size` records
    #[inline]
    pub fn record_batch(&self, size: usize) {
        self.batches.fetch_add(1, Ordering::Relaxed);
        self.largest_batch.fetch_max(size as u64, Ordering::Relaxed);
    }

    /// Record `count` records delivered to every selected sink
    #[inline]
    pub fn record_flushed(&self, count: usize) -> u64 {
        self.flushed.fetch_add(count as u64, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_error(&self) -> u64 {
        self.sink_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rotation(&self) -> u64 {
        self.rotations.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_format_error(&self) -> u64 {
        self.format_errors.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.enqueued.store(0, Ordering::Relaxed);
        self.rejected.store(0, Ordering::Relaxed);
        self.flushed.store(0, Ordering::Relaxed);
        self.batches.store(0, Ordering::Relaxed);
        self.largest_batch.store(0, Ordering::Relaxed);
        self.sink_errors.store(0, Ordering::Relaxed);
        self.rotations.store(0, Ordering::Relaxed);
        self.format_errors.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            enqueued: AtomicU64::new(self.enqueued()),
            rejected: AtomicU64::new(self.rejected()),
            flushed: AtomicU64::new(self.flushed()),
            batches: AtomicU64::new(self.batches()),
            largest_batch: AtomicU64::new(self.largest_batch()),
            sink_errors: AtomicU64::new(self.sink_errors()),
            rotations: AtomicU64::new(self.rotations()),
            format_errors: AtomicU64::new(self.format_errors()),
        }
    }
}
