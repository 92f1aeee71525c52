#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Ambient services shared by the benchmark programs: a seconds-resolution [`Clock`], seeded
//! uniform random fill, fallible buffer allocation, the relative error metric and logging setup.

mod buffer;
mod clock;
mod error;
mod fill;
mod logging;
mod metrics;

pub use buffer::*;
pub use clock::*;
pub use error::*;
pub use fill::*;
pub use logging::*;
pub use metrics::*;
