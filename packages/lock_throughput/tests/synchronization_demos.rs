//! The shared counter and produced signal demos behave the same for every interleaving.

use std::time::Duration;

use lock_throughput::{
    DEFAULT_CONSUMER_COUNT, DEFAULT_REPEAT_COUNT, ProducedSignal, SharedCounter,
};
use new_zealand::nz;

#[cfg_attr(miri, ignore)]
#[test]
fn two_counters_of_one_hundred_thousand() {
    let counter = SharedCounter::new();

    counter.count_concurrently(nz!(2), DEFAULT_REPEAT_COUNT);

    assert_eq!(counter.value(), 200_000);
}

#[cfg_attr(miri, ignore)]
#[test]
fn repeated_rounds_accumulate() {
    let counter = SharedCounter::new();

    counter.count_concurrently(nz!(4), 500);
    counter.count_concurrently(nz!(2), 500);

    assert_eq!(counter.value(), 3_000);
}

#[cfg_attr(miri, ignore)]
#[test]
fn default_consumers_see_produced() {
    let signal = ProducedSignal::new();

    let observed = signal.run_producer_consumers(DEFAULT_CONSUMER_COUNT, Duration::from_millis(50));

    assert_eq!(&*observed, &[true, true]);
    assert!(signal.is_produced());
}
