use derive_more::Display;
use par_region::WorkerPool;

use crate::{KernelOutcome, Result, atomic_sum, critical_sum, lock_sum, manual_sum, reduction_sum};

/// A way of merging per-worker partial sums into one total.
///
/// The display form is the label used in the benchmark tables.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Strategy {
    /// Private partials combined after the region.
    #[display("Reduction")]
    Reduction,

    /// Partials added to the total inside an anonymous monitor.
    #[display("Critical Section")]
    Critical,

    /// Every element added to an atomic total.
    #[display("Atomic")]
    Atomic,

    /// Explicitly computed blocks, partials added inside an anonymous monitor.
    #[display("Manual")]
    Manual,

    /// Partials added to the total under a named lock.
    #[display("Lock")]
    Lock,
}

impl Strategy {
    /// All strategies, in the order the benchmark reports them.
    pub const ALL: [Self; 5] = [
        Self::Reduction,
        Self::Critical,
        Self::Atomic,
        Self::Manual,
        Self::Lock,
    ];

    /// Sums `values` on the workers of `pool` using this strategy.
    ///
    /// # Errors
    ///
    /// Fails if the parallel region cannot be started.
    pub fn execute(self, pool: &WorkerPool, values: &[f64]) -> Result<KernelOutcome> {
        match self {
            Self::Reduction => reduction_sum(pool, values),
            Self::Critical => critical_sum(pool, values),
            Self::Atomic => atomic_sum(pool, values),
            Self::Manual => manual_sum(pool, values),
            Self::Lock => lock_sum(pool, values),
        }
    }
}
