use std::num::NonZero;
use std::ops::Range;

/// Returns the block of `0..len` that the worker `worker_id` of a `width`-worker region owns
/// under the default static share.
///
/// The blocks are contiguous and differ in length by at most one: the first `len % width`
/// workers receive one extra index. Together the blocks of all workers cover `0..len` exactly
/// once, and workers beyond the end of a short range receive an empty block.
///
/// # Examples
///
/// ```
/// use new_zealand::nz;
/// use par_region::static_block;
///
/// assert_eq!(static_block(10, nz!(4), 0), 0..3);
/// assert_eq!(static_block(10, nz!(4), 1), 3..6);
/// assert_eq!(static_block(10, nz!(4), 2), 6..8);
/// assert_eq!(static_block(10, nz!(4), 3), 8..10);
/// ```
#[must_use]
#[expect(
    clippy::integer_division,
    clippy::arithmetic_side_effects,
    reason = "block boundaries never exceed len, which is a valid usize"
)]
pub fn static_block(len: usize, width: NonZero<usize>, worker_id: usize) -> Range<usize> {
    debug_assert!(worker_id < width.get());

    let base = len / width.get();
    let extra = len % width.get();

    let start = worker_id * base + worker_id.min(extra);
    let end = start + base + usize::from(worker_id < extra);

    start..end
}

/// Returns the explicitly computed block `[id·⌊len/width⌋, (id+1)·⌊len/width⌋)` of `0..len`
/// for `worker_id`, with the last worker absorbing the remainder.
///
/// This is the hand-written partition that mirrors what a runtime does automatically. Unlike
/// [`static_block()`], all the slack lands on the last worker.
///
/// # Examples
///
/// ```
/// use new_zealand::nz;
/// use par_region::manual_block;
///
/// assert_eq!(manual_block(10, nz!(4), 0), 0..2);
/// assert_eq!(manual_block(10, nz!(4), 2), 4..6);
/// assert_eq!(manual_block(10, nz!(4), 3), 6..10);
/// ```
#[must_use]
#[expect(
    clippy::integer_division,
    clippy::arithmetic_side_effects,
    reason = "block boundaries never exceed len, which is a valid usize"
)]
pub fn manual_block(len: usize, width: NonZero<usize>, worker_id: usize) -> Range<usize> {
    debug_assert!(worker_id < width.get());

    let chunk = len / width.get();
    let start = worker_id * chunk;

    let end = if worker_id == width.get() - 1 {
        len
    } else {
        start + chunk
    };

    start..end
}
