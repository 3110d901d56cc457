use std::str::FromStr;

use crate::Error;

/// How a worker acquires the lock under test before holding it.
///
/// The label of each strategy (its `Display` form) is what appears in result records,
/// e.g. `MutexLockFunc` in `1,MutexLockFunc-10,123456`.
///
/// # Examples
///
/// ```
/// use lock_throughput::LockStrategy;
///
/// let strategy: LockStrategy = "WriteLockFunc".parse().unwrap();
/// assert_eq!(strategy, LockStrategy::RwWrite);
/// assert_eq!(strategy.to_string(), "WriteLockFunc");
/// ```
#[derive(Clone, Copy, Debug, derive_more::Display, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum LockStrategy {
    /// Shared acquisition of a read-write lock. Readers do not exclude each other.
    #[display("ReadLockFunc")]
    RwRead,

    /// Exclusive acquisition of a read-write lock.
    #[display("WriteLockFunc")]
    RwWrite,

    /// Acquisition of an exclusive mutex.
    #[display("MutexLockFunc")]
    Mutex,
}

impl LockStrategy {
    /// Every strategy, in the order a sweep measures them.
    pub const ALL: [Self; 3] = [Self::RwRead, Self::RwWrite, Self::Mutex];

    /// Whether holders of the lock exclude each other under this strategy.
    #[must_use]
    pub fn is_exclusive(self) -> bool {
        !matches!(self, Self::RwRead)
    }
}

impl FromStr for LockStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.to_string() == s)
            .ok_or_else(|| Error::UnknownStrategy {
                label: s.to_string(),
            })
    }
}
