use std::num::NonZero;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

/// State shared by the workers and the coordinator of a single throughput run.
///
/// The running flag is the only thing workers read in their measured loop. The per-worker counts
/// are written once per worker, after it leaves that loop, under a mutex that is distinct from the
/// lock under test so publishing never perturbs the measurement.
#[derive(Debug)]
pub(crate) struct RunState {
    running: AtomicBool,

    // One slot per worker, indexed by worker index. A slot is only ever written by its own worker.
    counts: Mutex<Box<[u64]>>,
}

impl RunState {
    pub(crate) fn new(worker_count: NonZero<usize>) -> Self {
        Self {
            running: AtomicBool::new(false),
            counts: Mutex::new(vec![0; worker_count.get()].into_boxed_slice()),
        }
    }

    /// Clears all counts and raises the running flag, arming the state for a new run.
    pub(crate) fn reset(&self) {
        self.counts.lock().fill(0);

        // Release pairs with the Acquire in `is_running()`, so a worker that observes the flag
        // also observes the cleared counts.
        self.running.store(true, Ordering::Release);
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Lowers the running flag. Workers notice eventually and may finish one in-flight iteration.
    pub(crate) fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Records the final count of one worker.
    ///
    /// # Panics
    ///
    /// Panics if `worker_index` is not less than the worker count the state was created for.
    pub(crate) fn publish(&self, worker_index: usize, count: u64) {
        let mut counts = self.counts.lock();

        *counts
            .get_mut(worker_index)
            .expect("worker index must be within the worker count the run state was created for") =
            count;
    }

    /// Returns a copy of the per-worker counts.
    ///
    /// Only meaningful once every worker has published, which the finish barrier guarantees.
    pub(crate) fn counts(&self) -> Box<[u64]> {
        self.counts.lock().clone()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use new_zealand::nz;
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(RunState: Send, Sync);

    #[test]
    fn starts_idle_with_zeroed_slots() {
        let state = RunState::new(nz!(3));

        assert!(!state.is_running());
        assert_eq!(&*state.counts(), &[0, 0, 0]);
    }

    #[test]
    fn reset_clears_previous_run() {
        let state = RunState::new(nz!(2));

        state.reset();
        state.publish(0, 10);
        state.publish(1, 20);
        state.stop();
        assert_eq!(&*state.counts(), &[10, 20]);

        state.reset();
        assert!(state.is_running());
        assert_eq!(&*state.counts(), &[0, 0]);
    }

    #[test]
    fn stop_lowers_flag() {
        let state = RunState::new(nz!(1));

        state.reset();
        assert!(state.is_running());

        state.stop();
        assert!(!state.is_running());
    }

    #[test]
    fn publish_only_touches_own_slot() {
        let state = RunState::new(nz!(4));

        state.publish(2, 7);

        assert_eq!(&*state.counts(), &[0, 0, 7, 0]);
    }

    #[test]
    #[should_panic]
    fn publish_out_of_range_panics() {
        let state = RunState::new(nz!(2));

        state.publish(2, 1);
    }
}
