#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Benchmarks square matrix multiplication with the rows of the result split into tiles of
//! `chunk` consecutive rows, distributed between workers under a [`Schedule`].
//!
//! * [`Schedule::Static`] fixes the assignment at region entry: worker `i` computes tiles
//!   `i`, `i + W`, `i + 2W` and so on.
//! * [`Schedule::Dynamic`] lets workers claim the next unclaimed tile from a shared cursor
//!   whenever they finish one.
//!
//! Both compute every element as `Σₖ A[i][k]·B[k][j]` in increasing `k` order, so the result is
//! bit-identical to [`multiply_sequential`] whatever the schedule, chunk size or worker count.
//!
//! The [`Runner`] sweeps combinations of those parameters from a [`Config`] built from the
//! command line and streams one result per experiment to a [`Reporter`].
//!
//! # Example
//!
//! ```
//! use new_zealand::nz;
//! use par_region::WorkerPool;
//! use tiled_matmul::{Matrix, Schedule, multiply_tiled};
//!
//! let a = Matrix::identity(3).unwrap();
//! let b = Matrix::filled(3, 2.0).unwrap();
//! let mut c = Matrix::zeroed(3).unwrap();
//!
//! multiply_tiled(&WorkerPool::new(nz!(2)), &a, &b, &mut c, nz!(1), Schedule::Dynamic).unwrap();
//!
//! assert_eq!(c, b);
//! ```

mod config;
mod error;
mod matrix;
mod multiply;
mod reporter;
mod runner;
mod schedule;

pub use config::*;
pub use error::*;
pub use matrix::*;
pub use multiply::*;
pub use reporter::*;
pub use runner::*;
pub use schedule::*;
