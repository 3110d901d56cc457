#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

//! Binary entry point that runs the full lock throughput sweep.
//!
//! Result records go to standard output, one per line. Diagnostics go to standard error and are
//! limited to warnings unless raised via `RUST_LOG` (e.g. `RUST_LOG=lock_throughput=debug`).

use std::io;
use std::process::ExitCode;

use lock_throughput::{SweepConfig, write_sweep};
use tracing_subscriber::EnvFilter;

// Binary entry point - mutations would require subprocess testing which is impractical.
#[cfg_attr(test, mutants::skip)]
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = SweepConfig::default();

    match write_sweep(&config, &mut io::stdout().lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
