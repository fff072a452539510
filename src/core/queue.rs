//! Hand-off queue between producer threads and the batch worker
//!
//! An unbounded FIFO guarded by a single mutex. The "data available" signal is
//! level-triggered: a consumer re-checks the item count under the lock before
//! and after every wait, so concurrent enqueues can never mask one another's
//! wake-ups. After a successful dequeue the signal is re-raised if items remain.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Multi-producer, single-consumer FIFO with blocking dequeue and timeout.
///
/// # Example
///
/// ```
/// use rust_batch_logger::core::HandoffQueue;
/// use std::time::Duration;
///
/// let queue = HandoffQueue::new();
/// queue.enqueue("first").unwrap();
/// queue.enqueue("second").unwrap();
///
/// assert_eq!(queue.dequeue(Duration::from_millis(10)), Some("first"));
/// assert_eq!(queue.try_dequeue(), Some("second"));
/// assert_eq!(queue.dequeue(Duration::from_millis(10)), None);
/// ```
pub struct HandoffQueue<T> {
    state: Mutex<QueueState<T>>,
    available: Condvar,
}

impl<T> HandoffQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Append `item` to the tail and signal availability.
    ///
    /// Never blocks beyond the queue's critical section. The only failure is a
    /// closed queue, in which case the item is handed back.
    pub fn enqueue(&self, item: T) -> std::result::Result<(), T> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(item);
        }
        state.items.push_back(item);
        drop(state);

        self.available.notify_one();
        Ok(())
    }

    /// Remove the oldest item, waiting up to `timeout` for one to arrive.
    ///
    /// Returns `None` on timeout, or immediately once the queue is closed and
    /// empty. A closed queue still yields the items it holds.
    pub fn dequeue(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.state.lock();

        loop {
            if let Some(item) = state.items.pop_front() {
                if !state.items.is_empty() {
                    self.available.notify_one();
                }
                return Some(item);
            }
            if state.closed {
                return None;
            }

            match deadline {
                Some(deadline) => {
                    if self.available.wait_until(&mut state, deadline).timed_out() {
                        return state.items.pop_front();
                    }
                }
                None => self.available.wait(&mut state),
            }
        }
    }

    /// Non-blocking dequeue.
    pub fn try_dequeue(&self) -> Option<T> {
        self.state.lock().items.pop_front()
    }

    /// Remove every queued item in FIFO order.
    pub fn drain(&self) -> Vec<T> {
        self.state.lock().items.drain(..).collect()
    }

    /// Snapshot of the number of queued items.
    ///
    /// Only a heuristic: producers may change it as soon as the lock is released.
    pub fn count(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Reject further enqueues and wake every waiting consumer.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.available.notify_all();
    }

    pub fn reopen(&self) {
        self.state.lock().closed = false;
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

impl<T> Default for HandoffQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
