use std::hint::black_box;

use parking_lot::{Mutex, RwLock};

use crate::LockStrategy;

/// The locks that workers contend on during a throughput measurement.
///
/// One instance is shared by every worker of a [`ThroughputChecker`][crate::ThroughputChecker].
/// The locks protect no data; the measured quantity is purely the cost of acquiring them and
/// the time spent holding them.
///
/// Acquisition is infallible. The guards release the lock on every exit path from
/// [`hold()`][Self::hold], including unwinding.
#[derive(Debug, Default)]
pub struct LocksUnderTest {
    mutex: Mutex<()>,
    rw_lock: RwLock<()>,
}

impl LocksUnderTest {
    /// Creates a fresh, unlocked set of locks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock selected by `strategy`, spins for `hold_time` busy cycles while
    /// holding it and then releases it.
    ///
    /// # Examples
    ///
    /// ```
    /// use lock_throughput::{LockStrategy, LocksUnderTest};
    ///
    /// let locks = LocksUnderTest::new();
    /// locks.hold(LockStrategy::Mutex, 100);
    /// locks.hold(LockStrategy::RwRead, 0);
    /// ```
    pub fn hold(&self, strategy: LockStrategy, hold_time: u32) {
        match strategy {
            LockStrategy::RwRead => {
                let _guard = self.rw_lock.read();
                spin(hold_time);
            }
            LockStrategy::RwWrite => {
                let _guard = self.rw_lock.write();
                spin(hold_time);
            }
            LockStrategy::Mutex => {
                let _guard = self.mutex.lock();
                spin(hold_time);
            }
        }
    }
}

// The hold section itself must not synchronize with anything, or we would be measuring that.
#[cfg_attr(test, mutants::skip)] // Spinning less is not observable without timing.
fn spin(hold_time: u32) {
    for cycle in 0..hold_time {
        black_box(cycle);
    }
}
