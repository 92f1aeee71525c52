use std::io;

use par_region::RegionError;
use thiserror::Error;

/// Errors that abort the reduction benchmark.
///
/// Allocation failures are not among them: a size whose array cannot be allocated is reported
/// and skipped, and the sweep continues.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A parallel region could not be started.
    #[error(transparent)]
    Region(#[from] RegionError),

    /// The report could not be written.
    #[error("failed to write the benchmark report")]
    Output(#[from] io::Error),
}

/// A specialized `Result` type for reduction benchmark operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
