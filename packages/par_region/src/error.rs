use std::io;
use std::num::NonZero;

use thiserror::Error;

/// Errors that can occur when executing a parallel region.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegionError {
    /// The operating system refused to start one of the worker threads. Workers that had
    /// already started were joined before this error was returned.
    #[error("failed to create worker {worker_id} of a {width}-worker region")]
    WorkerCreation {
        /// The id of the worker that could not be started.
        worker_id: usize,

        /// The width of the region that was being started.
        width: NonZero<usize>,

        /// The error reported by the thread builder.
        #[source]
        source: io::Error,
    },
}

/// A specialized `Result` type for parallel region operations, returning the crate's
/// [`RegionError`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, RegionError>;
