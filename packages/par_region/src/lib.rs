#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Fork-join parallel regions for shared-memory benchmarks.
//!
//! A [`WorkerPool`] runs the same body on a fixed number of worker threads, hands every worker a
//! [`RegionContext`] with a unique id in `0..width` and returns only after every worker has been
//! joined. Workers borrow data from the caller for the duration of the region, so read-only
//! inputs and disjoint output slices can be shared without reference counting.
//!
//! The package also provides the synchronization primitives that region bodies use to combine
//! per-worker results:
//!
//! - [`Monitor`] - an anonymous critical section around a shared value.
//! - [`RegionLock`] - a named lock with explicit acquire and release.
//! - [`AtomicF64`] - a floating-point cell with lock-free addition, built on compare-and-swap.
//! - [`WorkerPool::parallel_reduce()`] - per-worker private accumulators merged by an
//!   associative combiner after the region ends.
//!
//! # Example
//!
//! ```
//! use new_zealand::nz;
//! use par_region::{Monitor, WorkerPool};
//!
//! let pool = WorkerPool::new(nz!(4));
//! let values: Vec<f64> = (1..=100).map(f64::from).collect();
//! let total = Monitor::new(0.0);
//!
//! pool.run(|ctx| {
//!     let partial: f64 = values[ctx.static_share(values.len())].iter().sum();
//!     total.enter(|sum| *sum += partial);
//! })
//! .unwrap();
//!
//! assert_eq!(total.into_inner(), 5050.0);
//! ```
//!
//! # Worker count
//!
//! [`WorkerPool::from_env()`] takes the width from the `PAR_REGION_WORKERS` environment variable
//! and falls back to the available parallelism of the machine. A width passed to
//! [`WorkerPool::new()`] always wins over the environment.

mod atomic_f64;
mod context;
mod error;
mod lock;
mod monitor;
mod partition;
mod pool;
mod reduce;

pub use atomic_f64::*;
pub use context::*;
pub use error::*;
pub use lock::*;
pub use monitor::*;
pub use partition::*;
pub use pool::*;
