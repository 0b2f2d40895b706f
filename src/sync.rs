//! A hand-rolled counting semaphore for the scan pipeline thread topology.
//!
//! The standard library has no semaphore, and the scan pipeline is specified in terms of
//! exactly five OS threads coordinating through five counted semaphores (`new_file_signal`,
//! `data_ready[0..2]`, `data_consumed[0..2]`) plus one mutex guarding the shared result store.
//! `parking_lot::Mutex` plus `Condvar` gives the cheapest building block for that primitive
//! without reaching for an async runtime that the rest of the pipeline does not use.

use parking_lot::{Condvar, Mutex};

/// A counting semaphore: `acquire` blocks while the count is zero, `release` increments it
/// and wakes one waiter.
pub struct Semaphore {
    state: Mutex<usize>,
    condvar: Condvar,
}

impl Semaphore {
    /// Create a semaphore with the given initial count.
    pub fn new(initial: usize) -> Self {
        Self {
            state: Mutex::new(initial),
            condvar: Condvar::new(),
        }
    }

    /// Block until the count is positive, then decrement it by one.
    pub fn acquire(&self) {
        let mut count = self.state.lock();
        while *count == 0 {
            self.condvar.wait(&mut count);
        }
        *count -= 1;
    }

    /// Increment the count by one and wake a single waiter.
    pub fn release(&self) {
        let mut count = self.state.lock();
        *count += 1;
        self.condvar.notify_one();
    }

    /// Current count, for diagnostics and tests. Not meant to be used for coordination: acting
    /// on the value after reading it races with other threads.
    pub fn count(&self) -> usize {
        *self.state.lock()
    }
}
