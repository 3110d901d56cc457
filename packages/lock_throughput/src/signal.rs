use std::num::NonZero;
use std::thread;
use std::time::Duration;

use new_zealand::nz;
use parking_lot::{Condvar, Mutex};
use tracing::trace;

/// How long the producer works before signaling, in the demo.
pub const DEFAULT_PRODUCE_DELAY: Duration = Duration::from_secs(1);

/// How many consumers wait for the producer, in the demo.
pub const DEFAULT_CONSUMER_COUNT: NonZero<usize> = nz!(2);

/// A one-way "data has been produced" flag that consumers can block on.
///
/// Consumers wait with a predicate that is rechecked on every wake, so neither spurious wakeups
/// nor a notification that arrives before a consumer starts waiting can make a consumer observe
/// the flag as unset.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use lock_throughput::ProducedSignal;
/// use new_zealand::nz;
///
/// let signal = ProducedSignal::new();
/// let observed = signal.run_producer_consumers(nz!(2), Duration::from_millis(10));
///
/// assert_eq!(&*observed, &[true, true]);
/// ```
#[derive(Debug, Default)]
pub struct ProducedSignal {
    produced: Mutex<bool>,
    produced_changed: Condvar,
}

impl ProducedSignal {
    /// Creates a signal in the "not produced" state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag and wakes every waiting consumer.
    pub fn produce(&self) {
        *self.produced.lock() = true;

        // Notify after releasing the lock so woken consumers do not immediately block on it.
        self.produced_changed.notify_all();
    }

    /// Blocks until the flag is set, then returns the flag as observed under the lock.
    #[must_use]
    pub fn wait_produced(&self) -> bool {
        let mut produced = self.produced.lock();

        self.produced_changed
            .wait_while(&mut produced, |produced| !*produced);

        *produced
    }

    /// Whether the flag has been set, without waiting.
    #[must_use]
    pub fn is_produced(&self) -> bool {
        *self.produced.lock()
    }

    /// Runs one producer that works for `produce_delay` before calling
    /// [`produce()`][Self::produce], and `consumers` threads that each call
    /// [`wait_produced()`][Self::wait_produced].
    ///
    /// Returns the flag value each consumer observed, indexed by consumer.
    ///
    /// # Panics
    ///
    /// Panics if a thread cannot be spawned or if any of the threads panics.
    #[must_use]
    pub fn run_producer_consumers(
        &self,
        consumers: NonZero<usize>,
        produce_delay: Duration,
    ) -> Box<[bool]> {
        thread::scope(|s| {
            thread::Builder::new()
                .name("producer".to_string())
                .spawn_scoped(s, || {
                    // Emulates a long-running process that eventually produces data.
                    thread::sleep(produce_delay);
                    self.produce();
                    trace!("produced");
                })
                .expect("failed to spawn producer thread: thread spawning failure is not supported");

            let consumer_handles = (0..consumers.get())
                .map(|consumer_index| {
                    thread::Builder::new()
                        .name(format!("consumer-{consumer_index}"))
                        .spawn_scoped(s, move || {
                            let observed = self.wait_produced();
                            trace!(consumer_index, observed, "consumer woke");
                            observed
                        })
                        .expect(
                            "failed to spawn consumer thread: thread spawning failure is not supported",
                        )
                })
                .collect::<Vec<_>>();

            consumer_handles
                .into_iter()
                .map(|handle| handle.join().expect("consumer thread panicked"))
                .collect()
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(ProducedSignal: Send, Sync);

    #[test]
    fn starts_unproduced() {
        assert!(!ProducedSignal::new().is_produced());
    }

    #[test]
    fn wait_after_produce_returns_immediately() {
        let signal = ProducedSignal::new();

        signal.produce();

        assert!(signal.wait_produced());
        assert!(signal.is_produced());
    }

    #[cfg_attr(miri, ignore)] // Real threads are slow under Miri.
    #[test]
    fn every_consumer_observes_produced() {
        let signal = ProducedSignal::new();

        let observed = signal.run_producer_consumers(nz!(8), Duration::from_millis(20));

        assert_eq!(observed.len(), 8);
        assert!(observed.iter().all(|produced| *produced));
    }

    #[cfg_attr(miri, ignore)] // Real threads are slow under Miri.
    #[test]
    fn consumers_arriving_after_produce_do_not_block() {
        let signal = ProducedSignal::new();

        // With no delay the producer may well finish before any consumer starts waiting.
        let observed = signal.run_producer_consumers(DEFAULT_CONSUMER_COUNT, Duration::ZERO);

        assert_eq!(&*observed, &[true, true]);
    }

    #[cfg_attr(miri, ignore)] // Real threads are slow under Miri.
    #[test]
    fn spurious_notification_does_not_release_consumer() {
        let signal = ProducedSignal::new();

        thread::scope(|s| {
            let consumer = s.spawn(|| signal.wait_produced());

            thread::sleep(Duration::from_millis(10));

            // Wake the consumer without setting the flag; it must go back to waiting.
            signal.produced_changed.notify_all();
            thread::sleep(Duration::from_millis(10));
            let released_early = consumer.is_finished();

            // Produce before asserting so a failure cannot leave the consumer blocked forever.
            signal.produce();

            assert!(!released_early);
            assert!(consumer.join().unwrap());
        });
    }
}
