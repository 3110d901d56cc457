use std::num::NonZero;
use std::ops::RangeInclusive;
use std::time::Duration;

use new_zealand::nz;

use crate::{Error, LockStrategy, Result};

/// How long workers are allowed to run in each measurement unless configured otherwise.
pub const DEFAULT_MEASUREMENT_WINDOW: Duration = Duration::from_secs(3);

const DEFAULT_MAX_THREADS: NonZero<usize> = nz!(14);
const DEFAULT_HOLD_TIME_EXPONENTS: RangeInclusive<u32> = 1..=4;

/// The parameters of a single throughput measurement.
///
/// # Examples
///
/// ```
/// use lock_throughput::{BenchmarkConfig, LockStrategy};
/// use new_zealand::nz;
///
/// let config = BenchmarkConfig::new(nz!(4), 1_000, LockStrategy::RwWrite);
/// assert_eq!(config.num_threads().get(), 4);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct BenchmarkConfig {
    num_threads: NonZero<usize>,
    hold_time: u32,
    strategy: LockStrategy,
}

impl BenchmarkConfig {
    /// Describes a run of `num_threads` workers, each holding the lock selected by `strategy`
    /// for `hold_time` busy cycles per iteration.
    #[must_use]
    pub fn new(num_threads: NonZero<usize>, hold_time: u32, strategy: LockStrategy) -> Self {
        Self {
            num_threads,
            hold_time,
            strategy,
        }
    }

    /// The number of worker threads contending on the lock.
    #[must_use]
    pub fn num_threads(&self) -> NonZero<usize> {
        self.num_threads
    }

    /// The number of busy cycles each worker spends holding the lock per iteration.
    #[must_use]
    pub fn hold_time(&self) -> u32 {
        self.hold_time
    }

    /// How the lock is acquired.
    #[must_use]
    pub fn strategy(&self) -> LockStrategy {
        self.strategy
    }
}

/// The combinations measured by a full sweep, together with the measurement window.
///
/// The default configuration measures thread counts 1 through 14, hold times of 10, 100, 1000 and
/// 10000 busy cycles, and every [`LockStrategy`], each for a three-second window.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use lock_throughput::{LockStrategy, SweepConfig};
/// use new_zealand::nz;
///
/// let config = SweepConfig::builder()
///     .max_threads(nz!(2))
///     .hold_time_exponents(1..=2)
///     .strategies([LockStrategy::Mutex])
///     .measurement_window(Duration::from_millis(10))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.hold_times(), &[10, 100]);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SweepConfig {
    max_threads: NonZero<usize>,
    hold_times: Vec<u32>,
    strategies: Vec<LockStrategy>,
    measurement_window: Duration,
}

impl SweepConfig {
    /// Starts configuring a sweep, with every setting at its default value.
    pub fn builder() -> SweepConfigBuilder {
        SweepConfigBuilder::new()
    }

    /// Thread counts are swept from 1 up to and including this value.
    #[must_use]
    pub fn max_threads(&self) -> NonZero<usize> {
        self.max_threads
    }

    /// The hold times to measure for every thread count, in increasing order.
    #[must_use]
    pub fn hold_times(&self) -> &[u32] {
        &self.hold_times
    }

    /// The strategies to measure for every hold time, in the order they are measured.
    #[must_use]
    pub fn strategies(&self) -> &[LockStrategy] {
        &self.strategies
    }

    /// How long the workers run in each measurement.
    #[must_use]
    pub fn measurement_window(&self) -> Duration {
        self.measurement_window
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self::builder()
            .build()
            .expect("default sweep configuration is statically known to be valid")
    }
}

/// Builds a [`SweepConfig`], validating the combination of settings on [`build()`][Self::build].
#[derive(Clone, Debug)]
#[must_use]
pub struct SweepConfigBuilder {
    max_threads: NonZero<usize>,
    hold_time_exponents: RangeInclusive<u32>,
    strategies: Vec<LockStrategy>,
    measurement_window: Duration,
}

impl SweepConfigBuilder {
    fn new() -> Self {
        Self {
            max_threads: DEFAULT_MAX_THREADS,
            hold_time_exponents: DEFAULT_HOLD_TIME_EXPONENTS,
            strategies: LockStrategy::ALL.to_vec(),
            measurement_window: DEFAULT_MEASUREMENT_WINDOW,
        }
    }

    /// Sweeps thread counts from 1 up to and including `max_threads`.
    pub fn max_threads(mut self, max_threads: NonZero<usize>) -> Self {
        self.max_threads = max_threads;
        self
    }

    /// Measures a hold time of `10^exponent` busy cycles for every exponent in the range.
    pub fn hold_time_exponents(mut self, exponents: RangeInclusive<u32>) -> Self {
        self.hold_time_exponents = exponents;
        self
    }

    /// Measures these strategies, in this order, for every hold time.
    pub fn strategies(mut self, strategies: impl IntoIterator<Item = LockStrategy>) -> Self {
        self.strategies = strategies.into_iter().collect();
        self
    }

    /// Lets the workers run for `window` in every measurement.
    pub fn measurement_window(mut self, window: Duration) -> Self {
        self.measurement_window = window;
        self
    }

    /// Validates the settings and produces the sweep configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HoldTimeOverflow`] if a hold time exponent is so large that the hold time
    /// does not fit in a `u32`, and [`Error::InvalidSweep`] if the sweep would measure nothing.
    pub fn build(self) -> Result<SweepConfig> {
        if self.hold_time_exponents.is_empty() {
            return Err(Error::InvalidSweep {
                problem: format!(
                    "hold time exponent range {:?} is empty",
                    self.hold_time_exponents
                ),
            });
        }

        if self.strategies.is_empty() {
            return Err(Error::InvalidSweep {
                problem: "no lock strategies selected".to_string(),
            });
        }

        let hold_times = self
            .hold_time_exponents
            .map(|exponent| {
                10_u32
                    .checked_pow(exponent)
                    .ok_or(Error::HoldTimeOverflow { exponent })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SweepConfig {
            max_threads: self.max_threads,
            hold_times,
            strategies: self.strategies,
            measurement_window: self.measurement_window,
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn default_is_full_sweep() {
        let config = SweepConfig::default();

        assert_eq!(config.max_threads().get(), 14);
        assert_eq!(config.hold_times(), &[10, 100, 1_000, 10_000]);
        assert_eq!(config.strategies(), &LockStrategy::ALL);
        assert_eq!(config.measurement_window(), Duration::from_secs(3));
    }

    #[test]
    fn exponent_zero_means_one_cycle() {
        let config = SweepConfig::builder()
            .hold_time_exponents(0..=0)
            .build()
            .unwrap();

        assert_eq!(config.hold_times(), &[1]);
    }

    #[test]
    fn largest_representable_exponent_is_accepted() {
        let config = SweepConfig::builder()
            .hold_time_exponents(9..=9)
            .build()
            .unwrap();

        assert_eq!(config.hold_times(), &[1_000_000_000]);
    }

    #[test]
    fn overflowing_exponent_is_rejected() {
        let result = SweepConfig::builder().hold_time_exponents(8..=10).build();

        assert!(matches!(
            result,
            Err(Error::HoldTimeOverflow { exponent: 10 })
        ));
    }

    #[test]
    #[expect(
        clippy::reversed_empty_ranges,
        reason = "testing that empty ranges are rejected"
    )]
    fn empty_exponent_range_is_rejected() {
        let result = SweepConfig::builder().hold_time_exponents(4..=1).build();

        assert!(matches!(result, Err(Error::InvalidSweep { .. })));
    }

    #[test]
    fn empty_strategy_list_is_rejected() {
        let result = SweepConfig::builder().strategies([]).build();

        assert!(matches!(result, Err(Error::InvalidSweep { .. })));
    }

    #[test]
    fn strategy_order_is_preserved() {
        let config = SweepConfig::builder()
            .strategies([LockStrategy::Mutex, LockStrategy::RwRead])
            .build()
            .unwrap();

        assert_eq!(
            config.strategies(),
            &[LockStrategy::Mutex, LockStrategy::RwRead]
        );
    }

    #[test]
    fn benchmark_config_exposes_its_parts() {
        let config = BenchmarkConfig::new(nz!(3), 100, LockStrategy::RwRead);

        assert_eq!(config.num_threads().get(), 3);
        assert_eq!(config.hold_time(), 100);
        assert_eq!(config.strategy(), LockStrategy::RwRead);
    }
}
