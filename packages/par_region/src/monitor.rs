use parking_lot::Mutex;

/// An anonymous critical section around a shared value.
///
/// At most one worker executes a section entered through [`enter()`][Self::enter] at any
/// instant. The monitor is meant to be created right before a region, borrowed by its workers
/// and consumed with [`into_inner()`][Self::into_inner] once the region has returned.
///
/// # Examples
///
/// ```
/// use new_zealand::nz;
/// use par_region::{Monitor, WorkerPool};
///
/// let visits = Monitor::new(0_u64);
///
/// WorkerPool::new(nz!(4))
///     .run(|_| {
///         for _ in 0..1000 {
///             visits.enter(|count| *count += 1);
///         }
///     })
///     .unwrap();
///
/// assert_eq!(visits.into_inner(), 4000);
/// ```
#[derive(Debug, Default)]
pub struct Monitor<T> {
    value: Mutex<T>,
}

impl<T> Monitor<T> {
    /// Creates a monitor guarding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
        }
    }

    /// Executes `section` with exclusive access to the guarded value, blocking while another
    /// worker is inside the monitor.
    pub fn enter<R>(&self, section: impl FnOnce(&mut T) -> R) -> R {
        let mut value = self.value.lock();
        section(&mut value)
    }

    /// Consumes the monitor and returns the guarded value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}
