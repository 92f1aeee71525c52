use std::sync::atomic::Ordering;

use bench_support::Clock;
use par_region::{AtomicF64, Monitor, RegionLock, WorkerPool};

use crate::Result;

/// Sum computed by one kernel invocation, together with the wall time the parallel part took.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KernelOutcome {
    sum: f64,
    seconds: f64,
}

impl KernelOutcome {
    /// Records a sum and the seconds it took to compute.
    #[must_use]
    pub fn new(sum: f64, seconds: f64) -> Self {
        Self { sum, seconds }
    }

    /// The sum of all elements.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Seconds spent in the parallel region and the final merge.
    #[must_use]
    pub fn seconds(&self) -> f64 {
        self.seconds
    }
}

/// Sums the array on the calling thread, visiting elements in index order.
///
/// This is the reference every parallel strategy is compared against.
#[must_use]
pub fn sequential_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0;

    for value in values {
        sum += value;
    }

    sum
}

/// Every worker folds its static share into a private partial; the partials are combined in
/// worker id order after the region.
///
/// # Errors
///
/// Fails if the parallel region cannot be started.
#[expect(
    clippy::indexing_slicing,
    reason = "the reduced range is exactly the index range of the slice"
)]
pub fn reduction_sum(pool: &WorkerPool, values: &[f64]) -> Result<KernelOutcome> {
    let clock = Clock::new();

    let (sum, seconds) = clock.measure(|| {
        pool.parallel_reduce(
            0..values.len(),
            0.0,
            |partial, index| partial + values[index],
            |left, right| left + right,
        )
    });

    Ok(KernelOutcome { sum: sum?, seconds })
}

/// Every worker sums its static share privately, then adds the partial to the shared total
/// inside an anonymous monitor.
///
/// # Errors
///
/// Fails if the parallel region cannot be started.
pub fn critical_sum(pool: &WorkerPool, values: &[f64]) -> Result<KernelOutcome> {
    let total = Monitor::new(0.0);
    let clock = Clock::new();

    let (region, seconds) = clock.measure(|| {
        pool.run(|ctx| {
            let partial = sequential_sum(share(values, ctx.static_share(values.len())));
            total.enter(|sum| *sum += partial);
        })
    });
    region?;

    Ok(KernelOutcome {
        sum: total.into_inner(),
        seconds,
    })
}

/// Every worker adds each element of its static share to an atomic total, one element at a time.
///
/// This makes one contended read-modify-write per element and is expected to be the slowest
/// strategy by a wide margin.
///
/// # Errors
///
/// Fails if the parallel region cannot be started.
pub fn atomic_sum(pool: &WorkerPool, values: &[f64]) -> Result<KernelOutcome> {
    let total = AtomicF64::new(0.0);
    let clock = Clock::new();

    let (region, seconds) = clock.measure(|| {
        pool.run(|ctx| {
            for value in share(values, ctx.static_share(values.len())) {
                total.fetch_add(*value, Ordering::Relaxed);
            }
        })
    });
    region?;

    Ok(KernelOutcome {
        sum: total.into_inner(),
        seconds,
    })
}

/// Every worker computes its own block boundaries from its id, sums the block privately and adds
/// the partial to the shared total inside an anonymous monitor.
///
/// Blocks are `⌊N/W⌋` elements long and the last worker takes whatever remains.
///
/// # Errors
///
/// Fails if the parallel region cannot be started.
pub fn manual_sum(pool: &WorkerPool, values: &[f64]) -> Result<KernelOutcome> {
    let total = Monitor::new(0.0);
    let clock = Clock::new();

    let (region, seconds) = clock.measure(|| {
        pool.run(|ctx| {
            let partial = sequential_sum(share(values, ctx.manual_share(values.len())));
            total.enter(|sum| *sum += partial);
        })
    });
    region?;

    Ok(KernelOutcome {
        sum: total.into_inner(),
        seconds,
    })
}

/// Every worker sums its static share privately, then adds the partial to the shared total
/// while holding a named lock.
///
/// The lock is created before timing starts and consumed after timing ends.
///
/// # Errors
///
/// Fails if the parallel region cannot be started.
pub fn lock_sum(pool: &WorkerPool, values: &[f64]) -> Result<KernelOutcome> {
    let total = RegionLock::new("reduction_total", 0.0);
    let clock = Clock::new();

    let (region, seconds) = clock.measure(|| {
        pool.run(|ctx| {
            let partial = sequential_sum(share(values, ctx.static_share(values.len())));

            let mut sum = total.acquire();
            *sum += partial;
            sum.release();
        })
    });
    region?;

    Ok(KernelOutcome {
        sum: total.into_inner(),
        seconds,
    })
}

#[expect(
    clippy::indexing_slicing,
    reason = "shares come from partitioning values.len(), a share out of bounds is a partition bug"
)]
fn share(values: &[f64], indexes: std::ops::Range<usize>) -> &[f64] {
    &values[indexes]
}
