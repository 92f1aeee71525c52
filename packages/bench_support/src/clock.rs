use std::time::Instant;

/// A monotonic wall clock that reports seconds as a real number.
///
/// All readings are relative to the moment the clock was created, so only differences between
/// readings are meaningful. The resolution is that of [`std::time::Instant`], which is well below
/// a millisecond on all supported platforms.
///
/// # Examples
///
/// ```
/// use bench_support::Clock;
///
/// let clock = Clock::new();
/// let start = clock.now();
/// let elapsed = clock.now() - start;
///
/// assert!(elapsed >= 0.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    /// Creates a clock whose origin is the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Seconds elapsed since the clock was created.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    /// Executes `f` and returns its result together with the seconds it took.
    pub fn measure<R>(&self, f: impl FnOnce() -> R) -> (R, f64) {
        let start = self.now();
        let result = f();
        let elapsed = self.now() - start;

        (result, elapsed)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
