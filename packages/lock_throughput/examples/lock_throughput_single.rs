//! Measures one configuration and prints its result record.

use std::time::Duration;

use lock_throughput::{LockStrategy, ThroughputChecker};
use new_zealand::nz;

fn main() {
    let mut checker = ThroughputChecker::with_measurement_window(nz!(4), Duration::from_secs(1));

    for strategy in LockStrategy::ALL {
        println!("{}", checker.measure(1_000, strategy));
    }
}
