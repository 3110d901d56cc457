use std::num::NonZero;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::run_state::RunState;
use crate::worker_pool::{self, WorkerShared};
use crate::{
    BenchmarkConfig, DEFAULT_MEASUREMENT_WINDOW, LockStrategy, LocksUnderTest, Rendezvous,
    ResultRecord,
};

/// Measures how many times a fixed number of worker threads can acquire, hold and release a
/// shared lock within a fixed wall-clock window.
///
/// A checker owns the locks under test and the launch/finish barriers for its thread count and
/// reuses them across measurements. Each measurement spawns fresh worker threads plus one
/// coordinator thread, which:
///
/// 1. Releases all workers together through the launch barrier.
/// 2. Sleeps for the measurement window while the workers loop.
/// 3. Lowers the running flag and waits at the finish barrier until every worker has published
///    its count.
/// 4. Derives the [`ResultRecord`] from the published counts.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use lock_throughput::{LockStrategy, ThroughputChecker};
/// use new_zealand::nz;
///
/// let mut checker = ThroughputChecker::with_measurement_window(nz!(2), Duration::from_millis(10));
/// let record = checker.measure(100, LockStrategy::RwWrite);
///
/// assert_eq!(record.worker_counts().len(), 2);
/// println!("{record}");
/// ```
#[derive(Debug)]
pub struct ThroughputChecker {
    num_threads: NonZero<usize>,
    measurement_window: Duration,

    locks: LocksUnderTest,
    run_state: RunState,

    // Both barriers have one party per worker plus one for the coordinator.
    launch: Rendezvous,
    finish: Rendezvous,
}

impl ThroughputChecker {
    /// Creates a checker for `num_threads` workers using the default three-second window.
    #[must_use]
    pub fn new(num_threads: NonZero<usize>) -> Self {
        Self::with_measurement_window(num_threads, DEFAULT_MEASUREMENT_WINDOW)
    }

    /// Creates a checker for `num_threads` workers that lets them run for `measurement_window`
    /// in every measurement.
    #[must_use]
    pub fn with_measurement_window(
        num_threads: NonZero<usize>,
        measurement_window: Duration,
    ) -> Self {
        let workers_plus_coordinator = num_threads.checked_add(1).expect(
            "we will never have so many threads that we overflow usize, even if we add one",
        );

        debug!(
            num_threads = num_threads.get(),
            ?measurement_window,
            "created lock throughput checker"
        );

        Self {
            num_threads,
            measurement_window,
            locks: LocksUnderTest::new(),
            run_state: RunState::new(num_threads),
            launch: Rendezvous::new(workers_plus_coordinator),
            finish: Rendezvous::new(workers_plus_coordinator),
        }
    }

    /// The number of worker threads this checker measures with.
    #[must_use]
    pub fn num_threads(&self) -> NonZero<usize> {
        self.num_threads
    }

    /// How long the workers run in each measurement.
    #[must_use]
    pub fn measurement_window(&self) -> Duration {
        self.measurement_window
    }

    /// Measures the throughput of `strategy` with `hold_time` busy cycles per lock hold.
    ///
    /// Blocks for (slightly more than) the measurement window.
    ///
    /// # Panics
    ///
    /// Panics if a worker or coordinator thread cannot be spawned, or if one of them panics.
    #[cfg_attr(test, mutants::skip)] // Mutations here tend to deadlock rather than fail.
    pub fn measure(&mut self, hold_time: u32, strategy: LockStrategy) -> ResultRecord {
        // Two concurrent measurements on the same checker would share barriers and counts and
        // deadlock or corrupt each other. Internally we only need `&self`; the `&mut` is purely
        // for caller safety.
        let config = BenchmarkConfig::new(self.num_threads, hold_time, strategy);

        self.run_state.reset();
        debug!(%strategy, hold_time, num_threads = self.num_threads.get(), "armed");

        let locks = &self.locks;
        let workload = move || locks.hold(strategy, hold_time);

        let shared = WorkerShared {
            run_state: &self.run_state,
            launch: &self.launch,
            finish: &self.finish,
        };

        let measurement_window = self.measurement_window;

        let worker_counts = thread::scope(|s| {
            let workers = worker_pool::spawn_workers(s, self.num_threads, shared, &workload);

            let coordinator = thread::Builder::new()
                .name("lock-throughput-coordinator".to_string())
                .spawn_scoped(s, move || coordinate(shared, measurement_window))
                .expect(
                    "failed to spawn coordinator thread: thread spawning failure is not supported",
                );

            let worker_counts = coordinator
                .join()
                .expect("coordinator thread panicked - the run cannot be aggregated");

            for worker in workers {
                worker
                    .join()
                    .expect("worker thread panicked - the run cannot be aggregated");
            }

            worker_counts
        });

        let record = ResultRecord::from_worker_counts(config, worker_counts);
        debug!(%strategy, hold_time, average = record.average(), "aggregated");

        record
    }

    /// Measures the throughput described by `config`.
    ///
    /// # Panics
    ///
    /// Panics if the configured thread count differs from the thread count of this checker, or
    /// for any of the reasons [`measure()`][Self::measure] panics.
    pub fn measure_config(&mut self, config: &BenchmarkConfig) -> ResultRecord {
        assert_eq!(
            config.num_threads(),
            self.num_threads,
            "a checker can only measure the thread count it was created for"
        );

        self.measure(config.hold_time(), config.strategy())
    }
}

/// The coordinator side of a run. Participates in both barriers as the final party.
fn coordinate(shared: WorkerShared<'_>, measurement_window: Duration) -> Box<[u64]> {
    shared.launch.wait();
    debug!("running");

    thread::sleep(measurement_window);

    shared.run_state.stop();
    debug!("draining");

    shared.finish.wait();

    // The finish barrier orders every publish before this read.
    shared.run_state.counts()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use new_zealand::nz;
    use static_assertions::assert_impl_all;

    use super::*;

    const SHORT_WINDOW: Duration = Duration::from_millis(20);

    assert_impl_all!(ThroughputChecker: Send, Sync);

    #[cfg_attr(miri, ignore)] // Real threads and real time are slow under Miri.
    #[test]
    fn one_count_per_worker() {
        let mut checker = ThroughputChecker::with_measurement_window(nz!(3), SHORT_WINDOW);

        let record = checker.measure(10, LockStrategy::Mutex);

        assert_eq!(record.worker_counts().len(), 3);
        assert_eq!(record.config().num_threads().get(), 3);
        assert_eq!(record.config().hold_time(), 10);
        assert_eq!(record.config().strategy(), LockStrategy::Mutex);
    }

    #[cfg_attr(miri, ignore)] // Real threads and real time are slow under Miri.
    #[test]
    fn uncontended_worker_makes_progress() {
        let mut checker = ThroughputChecker::with_measurement_window(nz!(1), SHORT_WINDOW);

        let record = checker.measure(10, LockStrategy::Mutex);

        assert!(record.average() > 0);
        assert!(record.to_string().starts_with("1,MutexLockFunc-10,"));
    }

    #[cfg_attr(miri, ignore)] // Real threads and real time are slow under Miri.
    #[test]
    fn checker_is_reusable_across_strategies() {
        let mut checker = ThroughputChecker::with_measurement_window(nz!(2), SHORT_WINDOW);

        for hold_time in [10, 100] {
            for strategy in LockStrategy::ALL {
                let record = checker.measure(hold_time, strategy);

                assert_eq!(record.worker_counts().len(), 2);
                assert_eq!(record.config().strategy(), strategy);
            }
        }

        // The final run has fully drained.
        assert!(!checker.run_state.is_running());
    }

    #[cfg_attr(miri, ignore)] // Real threads and real time are slow under Miri.
    #[test]
    fn measure_config_matches_measure() {
        let mut checker = ThroughputChecker::with_measurement_window(nz!(2), SHORT_WINDOW);
        let config = BenchmarkConfig::new(nz!(2), 100, LockStrategy::RwRead);

        let record = checker.measure_config(&config);

        assert_eq!(record.config(), &config);
    }

    #[test]
    #[should_panic]
    fn measure_config_rejects_other_thread_count() {
        let mut checker = ThroughputChecker::with_measurement_window(nz!(2), SHORT_WINDOW);
        let config = BenchmarkConfig::new(nz!(3), 100, LockStrategy::RwRead);

        let _record = checker.measure_config(&config);
    }

    #[test]
    fn defaults_to_three_second_window() {
        let checker = ThroughputChecker::new(nz!(4));

        assert_eq!(checker.num_threads().get(), 4);
        assert_eq!(checker.measurement_window(), Duration::from_secs(3));
        assert_eq!(checker.launch.parties().get(), 5);
        assert_eq!(checker.finish.parties().get(), 5);
    }
}
