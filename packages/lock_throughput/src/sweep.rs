use std::io::Write;
use std::iter;
use std::num::NonZero;

use tracing::debug;

use crate::{BenchmarkConfig, Result, ResultRecord, SweepConfig, ThroughputChecker};

/// Lists every measurement a sweep performs, in the order it performs them.
///
/// Thread counts are the outermost loop, then hold times, then strategies.
///
/// # Examples
///
/// ```
/// use lock_throughput::{SweepConfig, sweep_plan};
///
/// // 14 thread counts x 4 hold times x 3 strategies.
/// assert_eq!(sweep_plan(&SweepConfig::default()).count(), 168);
/// ```
pub fn sweep_plan(config: &SweepConfig) -> impl Iterator<Item = BenchmarkConfig> + '_ {
    thread_counts(config.max_threads()).flat_map(move |num_threads| {
        config.hold_times().iter().flat_map(move |&hold_time| {
            config
                .strategies()
                .iter()
                .map(move |&strategy| BenchmarkConfig::new(num_threads, hold_time, strategy))
        })
    })
}

fn thread_counts(max_threads: NonZero<usize>) -> impl Iterator<Item = NonZero<usize>> {
    iter::successors(Some(NonZero::<usize>::MIN), move |previous| {
        previous.checked_add(1).filter(|next| *next <= max_threads)
    })
}

/// Lazily runs the measurements of a sweep, one per call to `next()`.
///
/// One [`ThroughputChecker`] is created per thread count and reused for all hold times and
/// strategies measured with that thread count.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use lock_throughput::{LockStrategy, SweepConfig, run_sweep};
/// use new_zealand::nz;
///
/// let config = SweepConfig::builder()
///     .max_threads(nz!(2))
///     .hold_time_exponents(1..=1)
///     .strategies([LockStrategy::Mutex])
///     .measurement_window(Duration::from_millis(10))
///     .build()
///     .unwrap();
///
/// let lines: Vec<String> = run_sweep(&config).map(|record| record.to_string()).collect();
///
/// assert_eq!(lines.len(), 2);
/// assert!(lines[0].starts_with("1,MutexLockFunc-10,"));
/// assert!(lines[1].starts_with("2,MutexLockFunc-10,"));
/// ```
pub fn run_sweep(config: &SweepConfig) -> impl Iterator<Item = ResultRecord> + '_ {
    let mut checker: Option<ThroughputChecker> = None;

    sweep_plan(config).map(move |benchmark| {
        let checker = match checker.take() {
            Some(existing) if existing.num_threads() == benchmark.num_threads() => {
                checker.insert(existing)
            }
            _ => {
                debug!(
                    num_threads = benchmark.num_threads().get(),
                    "starting thread count"
                );

                checker.insert(ThroughputChecker::with_measurement_window(
                    benchmark.num_threads(),
                    config.measurement_window(),
                ))
            }
        };

        checker.measure_config(&benchmark)
    })
}

/// Runs every measurement of the sweep, writing one line per record to `output` as soon as the
/// record is available.
///
/// Returns the number of records written.
///
/// # Errors
///
/// Returns [`Error::Output`][crate::Error::Output] if writing to `output` fails. No further
/// measurements are started after a failed write.
pub fn write_sweep(config: &SweepConfig, output: &mut impl Write) -> Result<usize> {
    let mut written: usize = 0;

    for record in run_sweep(config) {
        writeln!(output, "{record}")?;
        output.flush()?;

        written = written
            .checked_add(1)
            .expect("a sweep cannot contain more measurements than fit in memory");
    }

    debug!(written, "sweep complete");

    Ok(written)
}
