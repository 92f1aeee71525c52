#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

//! Command line entry point of the tiled matrix multiplication benchmark.
//!
//! Results go to stdout, diagnostics to stderr. Exits with status 1 on invalid arguments, when a
//! worker thread cannot be started or when no experiment could be completed.

use std::io;
use std::process::ExitCode;

use bench_support::init_logging;
use tiled_matmul::{Config, CsvReporter, Runner, VerboseReporter};

// Process entry and exit codes are covered by running the binary, not by mutation testing.
#[cfg_attr(test, mutants::skip)]
fn main() -> ExitCode {
    init_logging();

    let env_args: Vec<String> = std::env::args().collect();
    let str_args: Vec<&str> = env_args.iter().map(String::as_str).collect();

    let command_name = str_args.first().copied().unwrap_or("tiled_matmul");

    let config = match Config::parse(command_name, str_args.get(1..).unwrap_or(&[])) {
        Ok(config) => config,
        Err(early_exit) => {
            return if early_exit.status.is_ok() {
                println!("{}", early_exit.output);
                ExitCode::SUCCESS
            } else {
                eprintln!("{}", early_exit.output);
                eprintln!("Run {command_name} --help for usage.");
                ExitCode::FAILURE
            };
        }
    };

    let stdout = io::stdout().lock();
    let runner = Runner::new(config);

    let outcome = if runner.config().verbose() {
        runner.run(&mut VerboseReporter::new(stdout))
    } else {
        runner.run(&mut CsvReporter::new(stdout))
    };

    match outcome {
        Ok(summary) if summary.any_completed() => ExitCode::SUCCESS,
        Ok(_) => {
            eprintln!("Error: no experiment could be completed.");
            ExitCode::FAILURE
        }
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}
