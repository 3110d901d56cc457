#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Measures lock throughput: how many acquire/hold/release cycles a fixed number of worker
//! threads complete against one shared lock within a fixed wall-clock window.
//!
//! The core is [`ThroughputChecker`], which coordinates a pool of workers through a launch
//! barrier, lets them loop for the measurement window and gathers their per-worker counts through
//! a finish barrier. Each measurement produces a [`ResultRecord`] whose `Display` form is the
//! reported line `<num_threads>,<strategy_label>-<hold_time>,<average_count>`.
//!
//! The lock strategies compared are those of [`LockStrategy`]: a read-write lock in read mode, the
//! same lock in write mode, and an exclusive mutex.
//!
//! This package is not meant for use in production, serving only as a tool for exploring how
//! different locks behave under contention.
//!
//! # Operating principles
//!
//! * Workers start together: nobody enters the measured loop until every worker and the
//!   coordinator have reached the launch barrier.
//! * Workers count privately and publish once, after the loop, so the only contended resource
//!   during the window is the lock under test.
//! * The coordinator aggregates only after the finish barrier, which every worker reaches after
//!   publishing.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use lock_throughput::{LockStrategy, ThroughputChecker};
//! use new_zealand::nz;
//!
//! let mut checker = ThroughputChecker::with_measurement_window(nz!(1), Duration::from_millis(10));
//!
//! let record = checker.measure(10, LockStrategy::Mutex);
//!
//! assert!(record.to_string().starts_with("1,MutexLockFunc-10,"));
//! ```
//!
//! # Synchronization demos
//!
//! Two smaller demonstrations of the same contract, synchronized access to a shared resource,
//! are also included:
//!
//! * [`SharedCounter`] - threads incrementing one counter under a mutex never lose an update.
//! * [`ProducedSignal`] - consumers waiting on a condition variable with a predicate never
//!   observe the "produced" flag as unset once woken.

mod checker;
mod config;
mod counter;
mod error;
mod record;
mod rendezvous;
mod run_state;
mod signal;
mod strategy;
mod sweep;
mod worker_pool;
mod workload;

pub use checker::*;
pub use config::*;
pub use counter::*;
pub use error::*;
pub use record::*;
pub use rendezvous::*;
pub use signal::*;
pub use strategy::*;
pub use sweep::*;
pub use workload::*;
