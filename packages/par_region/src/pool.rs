use std::env;
use std::num::NonZero;
use std::panic;
use std::thread::{self, ScopedJoinHandle};

use new_zealand::nz;
use tracing::{debug, trace, warn};

use crate::{RegionContext, RegionError};

/// Environment variable that provides the default width of a [`WorkerPool`].
pub const WIDTH_ENV_VAR: &str = "PAR_REGION_WORKERS";

/// Executes fork-join parallel regions on a fixed number of workers.
///
/// Every call to [`run()`][Self::run] starts `width` worker threads, passes each of them a
/// [`RegionContext`] with a unique id and waits for all of them to finish before returning.
/// Because the region is scoped to the call, the body may borrow anything the caller owns.
///
/// # Examples
///
/// ```
/// use new_zealand::nz;
/// use par_region::WorkerPool;
///
/// let pool = WorkerPool::new(nz!(3));
/// let ids = pool.run(|ctx| ctx.id()).unwrap();
///
/// assert_eq!(&*ids, &[0, 1, 2]);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WorkerPool {
    width: NonZero<usize>,
}

impl WorkerPool {
    /// Creates a pool that runs regions on exactly `width` workers.
    #[must_use]
    pub fn new(width: NonZero<usize>) -> Self {
        Self { width }
    }

    /// Creates a pool whose width is taken from the `PAR_REGION_WORKERS` environment variable,
    /// falling back to the available parallelism of the machine if the variable is not set or
    /// is not a positive integer.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(width_hint(env::var(WIDTH_ENV_VAR).ok().as_deref()))
    }

    /// The number of workers that every region of this pool runs on.
    #[must_use]
    pub fn width(&self) -> NonZero<usize> {
        self.width
    }

    /// Executes `body` on every worker of the pool and returns the results in worker id order.
    ///
    /// The call returns only after every started worker has finished. If a worker panics, the
    /// panic is resumed on the calling thread once all workers have been joined.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::WorkerCreation`] if a worker thread cannot be started. Workers
    /// started before the failure still run to completion and are joined first, but their
    /// results are discarded.
    pub fn run<F, R>(&self, body: F) -> crate::Result<Box<[R]>>
    where
        F: Fn(&RegionContext) -> R + Sync,
        R: Send,
    {
        let width = self.width;
        debug!(width = width.get(), "parallel region starting");

        let outcome = thread::scope(|scope| {
            let body = &body;

            let mut handles = Vec::with_capacity(width.get());
            let mut creation_error = None;

            for worker_id in 0..width.get() {
                let ctx = RegionContext::new(worker_id, width);

                let spawned = thread::Builder::new()
                    .name(format!("par-region-w{worker_id}"))
                    .spawn_scoped(scope, move || {
                        trace!(worker_id, "worker started");
                        ctx.enter(body)
                    });

                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(source) => {
                        creation_error = Some(RegionError::WorkerCreation {
                            worker_id,
                            width,
                            source,
                        });
                        break;
                    }
                }
            }

            // Join every worker before looking at any outcome, so nothing is left running
            // when an error or panic surfaces.
            let joined: Vec<_> = handles.into_iter().map(ScopedJoinHandle::join).collect();

            let mut results = Vec::with_capacity(joined.len());

            for result in joined {
                match result {
                    Ok(value) => results.push(value),
                    Err(payload) => panic::resume_unwind(payload),
                }
            }

            match creation_error {
                Some(error) => Err(error),
                None => Ok(results.into_boxed_slice()),
            }
        });

        match &outcome {
            Ok(_) => debug!(width = width.get(), "parallel region finished"),
            Err(error) => warn!(width = width.get(), %error, "parallel region failed"),
        }

        outcome
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Interprets the raw value of the width environment variable.
fn width_hint(raw: Option<&str>) -> NonZero<usize> {
    if let Some(raw) = raw {
        match raw.trim().parse::<NonZero<usize>>() {
            Ok(width) => return width,
            Err(error) => {
                warn!(value = raw, %error, "ignoring invalid {WIDTH_ENV_VAR}");
            }
        }
    }

    thread::available_parallelism().unwrap_or(nz!(1))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{current_id, current_width};

    #[test]
    fn width_hint_prefers_valid_value() {
        assert_eq!(width_hint(Some("6")), nz!(6));
        assert_eq!(width_hint(Some(" 12 ")), nz!(12));
    }

    #[test]
    fn width_hint_falls_back_on_invalid_value() {
        let fallback = thread::available_parallelism().unwrap_or(nz!(1));

        assert_eq!(width_hint(None), fallback);
        assert_eq!(width_hint(Some("0")), fallback);
        assert_eq!(width_hint(Some("many")), fallback);
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn results_are_in_id_order() {
        let results = WorkerPool::new(nz!(5)).run(|ctx| ctx.id() * 10).unwrap();

        assert_eq!(&*results, &[0, 10, 20, 30, 40]);
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn workers_see_their_position() {
        let positions = WorkerPool::new(nz!(3))
            .run(|_| (current_id(), current_width()))
            .unwrap();

        assert_eq!(
            &*positions,
            &[(0, nz!(3)), (1, nz!(3)), (2, nz!(3))]
        );
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn body_may_borrow_caller_state() {
        let counter = AtomicUsize::new(0);
        let data = vec![1_usize; 64];

        WorkerPool::new(nz!(4))
            .run(|ctx| {
                let share = &data[ctx.static_share(data.len())];
                counter.fetch_add(share.iter().sum(), Ordering::Relaxed);
            })
            .unwrap();

        assert_eq!(counter.into_inner(), 64);
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    #[should_panic(expected = "worker 1 failed")]
    fn worker_panic_reaches_caller() {
        WorkerPool::new(nz!(2))
            .run(|ctx| {
                assert!(ctx.id() != 1, "worker 1 failed");
            })
            .unwrap();
    }
}
