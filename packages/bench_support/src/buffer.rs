use std::mem;

use tracing::trace;

use crate::AllocationError;

/// Allocates a zero-filled buffer of `len` doubles, reporting allocator failure as an error
/// instead of aborting the process.
///
/// # Errors
///
/// Returns [`AllocationError::OutOfMemory`] if the allocator cannot provide the memory.
pub fn try_zeroed(len: usize) -> Result<Vec<f64>, AllocationError> {
    trace!(elements = len, "allocating zeroed buffer");

    let mut buffer = Vec::new();

    buffer
        .try_reserve_exact(len)
        .map_err(|source| AllocationError::OutOfMemory {
            elements: len,
            bytes: len.saturating_mul(mem::size_of::<f64>()),
            source,
        })?;

    buffer.resize(len, 0.0);
    Ok(buffer)
}

/// Allocates a zero-filled `rows` x `columns` buffer of doubles in row-major order.
///
/// # Errors
///
/// Returns [`AllocationError::TooLarge`] if the element count overflows and
/// [`AllocationError::OutOfMemory`] if the allocator cannot provide the memory.
pub fn try_zeroed_grid(rows: usize, columns: usize) -> Result<Vec<f64>, AllocationError> {
    let len = rows
        .checked_mul(columns)
        .ok_or(AllocationError::TooLarge { rows, columns })?;

    try_zeroed(len)
}

/// The size in mebibytes of a buffer of `len` doubles, for reporting.
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "only used for human-readable reporting"
)]
pub fn footprint_mib(len: usize) -> f64 {
    len.saturating_mul(mem::size_of::<f64>()) as f64 / (1024.0 * 1024.0)
}
