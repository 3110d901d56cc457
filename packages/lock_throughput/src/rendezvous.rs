use std::num::NonZero;

use parking_lot::{Condvar, Mutex};

/// A reusable barrier that releases its parties only once a fixed number of them have arrived.
///
/// Arrivals are grouped into generations. The last party to arrive in a generation starts the
/// next one and wakes everyone waiting on the current one. A waiter only leaves once the
/// generation it arrived in has ended, so a fast party that immediately re-enters
/// [`wait()`][Self::wait] counts towards the next generation and cannot release (or be released
/// together with) parties that are still draining from the previous one.
///
/// # Examples
///
/// ```
/// use std::num::NonZero;
/// use std::thread;
///
/// use lock_throughput::Rendezvous;
///
/// let rendezvous = Rendezvous::new(NonZero::new(3).unwrap());
///
/// thread::scope(|s| {
///     for _ in 0..2 {
///         s.spawn(|| rendezvous.wait());
///     }
///
///     rendezvous.wait();
/// });
/// ```
#[derive(Debug)]
pub struct Rendezvous {
    parties: NonZero<usize>,
    state: Mutex<GenerationState>,
    generation_ended: Condvar,
}

#[derive(Debug)]
struct GenerationState {
    generation: u64,
    arrived: usize,
}

impl Rendezvous {
    /// Creates a rendezvous that releases its parties every time `parties` of them have arrived.
    #[must_use]
    pub fn new(parties: NonZero<usize>) -> Self {
        Self {
            parties,
            state: Mutex::new(GenerationState {
                generation: 0,
                arrived: 0,
            }),
            generation_ended: Condvar::new(),
        }
    }

    /// The number of parties that must arrive before any of them is released.
    #[must_use]
    pub fn parties(&self) -> NonZero<usize> {
        self.parties
    }

    /// Blocks until all parties of the current generation have arrived.
    ///
    /// Returns `true` for exactly one party per generation: the last one to arrive, which is
    /// the one that released the others.
    pub fn wait(&self) -> bool {
        let mut state = self.state.lock();

        let generation = state.generation;

        state.arrived = state
            .arrived
            .checked_add(1)
            .expect("arrivals are bounded by the party count, which fits in usize");

        if state.arrived == self.parties.get() {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);

            drop(state);
            self.generation_ended.notify_all();

            return true;
        }

        // Recheck on every wake: spurious wakeups and wakeups for an unrelated generation must
        // not release us early.
        while state.generation == generation {
            self.generation_ended.wait(&mut state);
        }

        false
    }
}
