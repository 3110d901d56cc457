use std::io;

use thiserror::Error;

/// Errors that can occur when configuring or reporting a lock throughput sweep.
///
/// The measurement itself has no recoverable failure modes: lock acquisition, barrier waits and
/// thread spawning are all treated as infallible, with spawn failure being fatal.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The caller provided a lock strategy label that does not name any known strategy.
    #[error(
        "unknown lock strategy '{label}': expected one of ReadLockFunc, WriteLockFunc, MutexLockFunc"
    )]
    UnknownStrategy {
        /// The label that failed to parse.
        label: String,
    },

    /// A hold time exponent was so large that `10^exponent` does not fit in the cycle counter.
    #[error("hold time exponent {exponent} overflows a 32-bit busy cycle count")]
    HoldTimeOverflow {
        /// The exponent that overflowed.
        exponent: u32,
    },

    /// The sweep configuration would not produce any benchmark runs.
    #[error("invalid sweep configuration: {problem}")]
    InvalidSweep {
        /// A human-readable description of the problem.
        problem: String,
    },

    /// A result record could not be written to the output.
    #[error("failed to write result record: {0}")]
    Output(#[from] io::Error),
}

/// A specialized `Result` type for lock throughput operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn unknown_strategy_names_the_label() {
        let error = Error::UnknownStrategy {
            label: "SpinLockFunc".to_string(),
        };

        assert!(error.to_string().contains("'SpinLockFunc'"));
    }

    #[test]
    fn io_error_converts_into_output() {
        let error: Error = io::Error::new(io::ErrorKind::BrokenPipe, "closed").into();

        assert!(matches!(error, Error::Output(_)));
        assert!(error.to_string().starts_with("failed to write result record"));
    }
}
