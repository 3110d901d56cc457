//! One producer signals two consumers through a condition variable. Every consumer reports
//! that the data was produced.

use lock_throughput::{DEFAULT_CONSUMER_COUNT, DEFAULT_PRODUCE_DELAY, ProducedSignal};

fn main() {
    let signal = ProducedSignal::new();

    for produced in signal.run_producer_consumers(DEFAULT_CONSUMER_COUNT, DEFAULT_PRODUCE_DELAY) {
        println!("produced: {produced}");
    }
}
