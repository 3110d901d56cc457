use std::num::NonZero;
use std::thread::{self, Scope, ScopedJoinHandle};

use tracing::trace;

use crate::Rendezvous;
use crate::run_state::RunState;

/// Everything a worker shares with its peers and the coordinator for the duration of one run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WorkerShared<'a> {
    pub(crate) run_state: &'a RunState,

    /// Releases all workers into the measured loop together.
    pub(crate) launch: &'a Rendezvous,

    /// Holds the coordinator back until every worker has published its count.
    pub(crate) finish: &'a Rendezvous,
}

/// Spawns `worker_count` threads in `scope`, each repeatedly calling `workload` while the run
/// state says the run is going.
///
/// Worker `i` publishes into slot `i` of the run state. The workers block at the launch barrier
/// immediately, so nothing happens until the coordinator arrives there as the final party.
///
/// # Panics
///
/// Panics if a thread cannot be spawned. We have no way to measure with fewer workers than
/// requested, so this is not a recoverable condition.
pub(crate) fn spawn_workers<'scope, 'env, F>(
    scope: &'scope Scope<'scope, 'env>,
    worker_count: NonZero<usize>,
    shared: WorkerShared<'env>,
    workload: &'env F,
) -> Box<[ScopedJoinHandle<'scope, ()>]>
where
    F: Fn() + Sync,
{
    (0..worker_count.get())
        .map(|worker_index| {
            thread::Builder::new()
                .name(format!("lock-throughput-w{worker_index}"))
                .spawn_scoped(scope, move || {
                    worker_entrypoint(worker_index, shared, workload);
                })
                .expect("failed to spawn worker thread: thread spawning failure is not supported")
        })
        .collect()
}

#[cfg_attr(test, mutants::skip)] // Mutations here tend to deadlock rather than fail.
fn worker_entrypoint<F>(worker_index: usize, shared: WorkerShared<'_>, workload: &F)
where
    F: Fn(),
{
    shared.launch.wait();

    // Private until published, so the counter itself is never contended.
    let mut count: u64 = 0;

    while shared.run_state.is_running() {
        workload();
        count = count.wrapping_add(1);
    }

    shared.run_state.publish(worker_index, count);
    trace!(worker_index, count, "worker published");

    shared.finish.wait();
}
