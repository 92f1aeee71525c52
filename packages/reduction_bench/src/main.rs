#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

//! Runs the full reduction benchmark and prints the report to stdout.
//!
//! Log records go to stderr; set `RUST_LOG` to see more than warnings.

use std::io;
use std::process::ExitCode;

use bench_support::init_logging;
use reduction_bench::{Harness, HarnessConfig};

// Process entry and exit codes are covered by running the binary, not by mutation testing.
#[cfg_attr(test, mutants::skip)]
fn main() -> ExitCode {
    init_logging();

    let harness = Harness::new(HarnessConfig::default());
    let mut stdout = io::stdout().lock();

    match harness.run(&mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}
