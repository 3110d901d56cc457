use std::fmt;

use crate::BenchmarkConfig;

/// The outcome of one throughput measurement.
///
/// The `Display` form is the line the benchmark reports for the measurement:
/// `<num_threads>,<strategy_label>-<hold_time>,<average_count>`.
///
/// # Examples
///
/// ```
/// use lock_throughput::{BenchmarkConfig, LockStrategy, ResultRecord};
/// use new_zealand::nz;
///
/// let config = BenchmarkConfig::new(nz!(2), 10, LockStrategy::Mutex);
/// let record = ResultRecord::from_worker_counts(config, Box::new([5, 8]));
///
/// assert_eq!(record.average(), 6);
/// assert_eq!(record.to_string(), "2,MutexLockFunc-10,6");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResultRecord {
    config: BenchmarkConfig,
    average: u64,
    worker_counts: Box<[u64]>,
}

impl ResultRecord {
    /// Derives the record of a run from the iteration counts its workers completed.
    ///
    /// The average is the sum of the counts divided by the thread count, truncated.
    ///
    /// # Panics
    ///
    /// Panics if the number of counts does not match the configured thread count.
    #[must_use]
    pub fn from_worker_counts(config: BenchmarkConfig, worker_counts: Box<[u64]>) -> Self {
        assert_eq!(
            worker_counts.len(),
            config.num_threads().get(),
            "every worker of the run must have published exactly one count"
        );

        let total = worker_counts.iter().fold(0_u64, |total, count| {
            total
                .checked_add(*count)
                .expect("iteration count overflow is unfathomable within a measurement window")
        });

        let divisor = u64::try_from(config.num_threads().get())
            .expect("thread counts that do not fit in u64 are impossible to spawn");

        let average = total
            .checked_div(divisor)
            .expect("thread count is NonZero, so division by zero is impossible");

        Self {
            config,
            average,
            worker_counts,
        }
    }

    /// The configuration that was measured.
    #[must_use]
    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// The mean number of iterations completed per worker, truncated towards zero.
    #[must_use]
    pub fn average(&self) -> u64 {
        self.average
    }

    /// The number of iterations each worker completed, indexed by worker.
    #[must_use]
    pub fn worker_counts(&self) -> &[u64] {
        &self.worker_counts
    }

    /// The number of iterations completed by all workers together.
    #[must_use]
    pub fn total(&self) -> u64 {
        // Cannot overflow: the same sum was already checked when the average was derived.
        self.worker_counts.iter().sum()
    }
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}-{},{}",
            self.config.num_threads(),
            self.config.strategy(),
            self.config.hold_time(),
            self.average
        )
    }
}
