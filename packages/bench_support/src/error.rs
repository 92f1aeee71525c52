use std::collections::TryReserveError;

use thiserror::Error;

/// A buffer could not be allocated.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AllocationError {
    /// The requested element count does not fit in the address space.
    #[error("a buffer of {rows} x {columns} elements exceeds the address space")]
    TooLarge {
        /// The number of rows requested.
        rows: usize,

        /// The number of columns requested.
        columns: usize,
    },

    /// The allocator refused to provide the memory.
    #[error("failed to allocate {elements} elements ({bytes} bytes)")]
    OutOfMemory {
        /// The number of elements requested.
        elements: usize,

        /// The number of bytes requested.
        bytes: usize,

        /// The error reported by the allocator.
        #[source]
        source: TryReserveError,
    },
}
