use std::num::NonZero;
use std::thread;

use parking_lot::Mutex;
use tracing::debug;

/// How many times each worker increments the counter in the demo.
pub const DEFAULT_REPEAT_COUNT: u64 = 100_000;

/// A counter that any number of threads can increment without losing updates.
///
/// Every increment happens under the counter's mutex, so the final value only depends on how
/// many increments were made and never on how the threads interleaved.
///
/// # Examples
///
/// ```
/// use lock_throughput::SharedCounter;
/// use new_zealand::nz;
///
/// let counter = SharedCounter::new();
/// counter.count_concurrently(nz!(2), 100_000);
///
/// assert_eq!(counter.value(), 200_000);
/// ```
#[derive(Debug, Default)]
pub struct SharedCounter {
    count: Mutex<u64>,
}

impl SharedCounter {
    /// Creates a counter starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the counter once.
    pub fn increment(&self) {
        let mut count = self.count.lock();

        *count = count
            .checked_add(1)
            .expect("counter overflow is unfathomable for any realistic repeat count");
    }

    /// Increments the counter `repeat` times, taking the lock separately for every increment.
    pub fn count_enough(&self, repeat: u64) {
        for _ in 0..repeat {
            self.increment();
        }
    }

    /// Spawns `workers` threads that each call [`count_enough()`][Self::count_enough] with
    /// `repeat`, waiting for all of them to finish.
    ///
    /// # Panics
    ///
    /// Panics if a thread cannot be spawned.
    pub fn count_concurrently(&self, workers: NonZero<usize>, repeat: u64) {
        thread::scope(|s| {
            for worker_index in 0..workers.get() {
                thread::Builder::new()
                    .name(format!("shared-counter-w{worker_index}"))
                    .spawn_scoped(s, || self.count_enough(repeat))
                    .expect(
                        "failed to spawn counter thread: thread spawning failure is not supported",
                    );
            }
        });

        debug!(workers = workers.get(), repeat, value = self.value(), "counting finished");
    }

    /// The current value of the counter.
    #[must_use]
    pub fn value(&self) -> u64 {
        *self.count.lock()
    }
}
