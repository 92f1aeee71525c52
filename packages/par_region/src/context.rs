use std::cell::Cell;
use std::num::NonZero;
use std::ops::Range;

use new_zealand::nz;

use crate::{manual_block, static_block};

thread_local! {
    /// The position of the current thread in the region it is executing, if any.
    static CURRENT: Cell<Option<RegionContext>> = const { Cell::new(None) };
}

/// The position of one worker within a parallel region.
///
/// Every worker of a region receives its own context. The id is unique within the region and
/// lies in `0..width`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RegionContext {
    id: usize,
    width: NonZero<usize>,
}

impl RegionContext {
    pub(crate) fn new(id: usize, width: NonZero<usize>) -> Self {
        debug_assert!(id < width.get());

        Self { id, width }
    }

    /// The id of this worker, in `0..width`.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// The number of workers in the region.
    #[must_use]
    pub fn width(&self) -> NonZero<usize> {
        self.width
    }

    /// Whether this is worker 0, the only worker that should report anything.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.id == 0
    }

    /// The indexes of `0..len` that this worker owns under the default static share.
    ///
    /// See [`static_block()`] for the exact partition.
    #[must_use]
    pub fn static_share(&self, len: usize) -> Range<usize> {
        static_block(len, self.width, self.id)
    }

    /// The indexes of `0..len` that this worker owns under the explicit manual partition.
    ///
    /// See [`manual_block()`] for the exact partition.
    #[must_use]
    pub fn manual_share(&self, len: usize) -> Range<usize> {
        manual_block(len, self.width, self.id)
    }

    /// Executes `body` with this context registered as the current thread's position, so that
    /// [`current_id()`] and [`current_width()`] report it.
    pub(crate) fn enter<R>(self, body: impl FnOnce(&Self) -> R) -> R {
        struct Restore(Option<RegionContext>);

        impl Drop for Restore {
            fn drop(&mut self) {
                CURRENT.set(self.0);
            }
        }

        let _restore = Restore(CURRENT.replace(Some(self)));

        body(&self)
    }
}

/// The id of the calling worker within the region it is executing.
///
/// Code running outside any region is treated as the only member of a team of one and
/// receives 0.
#[must_use]
pub fn current_id() -> usize {
    CURRENT.get().map_or(0, |ctx| ctx.id)
}

/// The width of the region the calling worker is executing.
///
/// Code running outside any region is treated as the only member of a team of one and
/// receives 1.
#[must_use]
pub fn current_width() -> NonZero<usize> {
    CURRENT.get().map_or(nz!(1), |ctx| ctx.width)
}
