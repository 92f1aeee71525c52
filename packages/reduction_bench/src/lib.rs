#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Compares five ways of summing an array of doubles on a pool of worker threads.
//!
//! Every [`Strategy`] splits the array between the workers of a
//! [`WorkerPool`][par_region::WorkerPool] and differs only in how the per-worker results reach
//! the final sum:
//!
//! | Strategy | Share of indexes | Merge |
//! |---|---|---|
//! | [`Strategy::Reduction`] | static | private partials combined after the region |
//! | [`Strategy::Critical`] | static | partial added inside an anonymous monitor |
//! | [`Strategy::Atomic`] | static | every element added to an atomic cell |
//! | [`Strategy::Manual`] | explicit `⌊N/W⌋` blocks | partial added inside an anonymous monitor |
//! | [`Strategy::Lock`] | static | partial added under a named lock |
//!
//! The [`Harness`] runs all strategies over a sweep of array sizes, compares each sum with a
//! sequential reference and reports mean time, speedup over [`Strategy::Reduction`] and relative
//! error. A second sweep varies the worker count at a fixed array size.
//!
//! # Example
//!
//! ```
//! use new_zealand::nz;
//! use par_region::WorkerPool;
//! use reduction_bench::Strategy;
//!
//! let pool = WorkerPool::new(nz!(4));
//! let values = [1.0, 2.0, 3.0, 4.0];
//!
//! for strategy in Strategy::ALL {
//!     let outcome = strategy.execute(&pool, &values).unwrap();
//!     assert_eq!(outcome.sum(), 10.0);
//! }
//! ```

mod config;
mod error;
mod harness;
mod kernels;
mod report;
mod strategy;
mod trial;

pub use config::*;
pub use error::*;
pub use harness::*;
pub use kernels::*;
pub use strategy::*;
pub use trial::*;
