use std::ops::{Deref, DerefMut};

use parking_lot::{Mutex, MutexGuard};
use tracing::trace;

/// A named lock with explicit acquire and release, guarding a shared value.
///
/// The lock exists for the lifetime of one region: create it before starting the region, let
/// the workers borrow it and consume it afterwards. Because workers only borrow the lock, it
/// cannot be destroyed while any of them could still hold it.
///
/// # Examples
///
/// ```
/// use new_zealand::nz;
/// use par_region::{RegionLock, WorkerPool};
///
/// let total = RegionLock::new("total", 0.0);
///
/// WorkerPool::new(nz!(2))
///     .run(|_| {
///         let mut guard = total.acquire();
///         *guard += 1.0;
///         guard.release();
///     })
///     .unwrap();
///
/// assert_eq!(total.into_inner(), 2.0);
/// ```
#[derive(Debug)]
pub struct RegionLock<T> {
    name: &'static str,
    value: Mutex<T>,
}

impl<T> RegionLock<T> {
    /// Creates a lock with a diagnostic name, guarding `value`.
    #[must_use]
    pub fn new(name: &'static str, value: T) -> Self {
        Self {
            name,
            value: Mutex::new(value),
        }
    }

    /// The diagnostic name of the lock.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Acquires the lock, blocking until no other worker holds it.
    pub fn acquire(&self) -> RegionLockGuard<'_, T> {
        let guard = self.value.lock();
        trace!(lock = self.name, "lock acquired");

        RegionLockGuard {
            name: self.name,
            guard,
        }
    }

    /// Acquires the lock if no other worker holds it at the moment.
    pub fn try_acquire(&self) -> Option<RegionLockGuard<'_, T>> {
        let guard = self.value.try_lock()?;
        trace!(lock = self.name, "lock acquired");

        Some(RegionLockGuard {
            name: self.name,
            guard,
        })
    }

    /// Consumes the lock and returns the guarded value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

/// Proof that a [`RegionLock`] is held. The lock is released when the guard is dropped or
/// passed to [`release()`][Self::release].
#[derive(Debug)]
pub struct RegionLockGuard<'a, T> {
    name: &'static str,
    guard: MutexGuard<'a, T>,
}

impl<T> RegionLockGuard<'_, T> {
    /// Releases the lock.
    pub fn release(self) {
        drop(self);
    }
}

impl<T> Drop for RegionLockGuard<'_, T> {
    fn drop(&mut self) {
        trace!(lock = self.name, "lock released");
    }
}

impl<T> Deref for RegionLockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> DerefMut for RegionLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}
