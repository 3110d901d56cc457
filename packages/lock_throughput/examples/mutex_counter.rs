//! Two threads increment a shared counter under a mutex. The output is always 200000.

use lock_throughput::{DEFAULT_REPEAT_COUNT, SharedCounter};
use new_zealand::nz;

fn main() {
    let counter = SharedCounter::new();

    counter.count_concurrently(nz!(2), DEFAULT_REPEAT_COUNT);

    println!("{}", counter.value());
}
