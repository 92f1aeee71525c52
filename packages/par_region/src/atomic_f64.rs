use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A 64-bit floating-point cell that supports lock-free atomic addition.
///
/// The platform has no native floating-point read-modify-write, so the value is stored as its
/// bit pattern in an [`AtomicU64`] and [`fetch_add()`][Self::fetch_add] retries a
/// compare-and-swap until no other thread has modified the cell in between.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::Ordering;
///
/// use par_region::AtomicF64;
///
/// let cell = AtomicF64::new(1.5);
/// let previous = cell.fetch_add(2.0, Ordering::Relaxed);
///
/// assert_eq!(previous, 1.5);
/// assert_eq!(cell.load(Ordering::Relaxed), 3.5);
/// ```
pub struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    /// Creates a cell holding `value`.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    /// Loads the current value.
    #[must_use]
    pub fn load(&self, order: Ordering) -> f64 {
        f64::from_bits(self.bits.load(order))
    }

    /// Replaces the current value.
    pub fn store(&self, value: f64, order: Ordering) {
        self.bits.store(value.to_bits(), order);
    }

    /// Adds `delta` to the current value and returns the value before the addition.
    ///
    /// `order` applies to the successful compare-and-swap; failed attempts use relaxed loads.
    pub fn fetch_add(&self, delta: f64, order: Ordering) -> f64 {
        let mut current = self.bits.load(Ordering::Relaxed);

        loop {
            let updated = (f64::from_bits(current) + delta).to_bits();

            match self
                .bits
                .compare_exchange_weak(current, updated, order, Ordering::Relaxed)
            {
                Ok(previous) => return f64::from_bits(previous),
                Err(actual) => current = actual,
            }
        }
    }

    /// Consumes the cell and returns the value.
    #[must_use]
    pub fn into_inner(self) -> f64 {
        f64::from_bits(self.bits.into_inner())
    }
}

impl Default for AtomicF64 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl fmt::Debug for AtomicF64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicF64")
            .field(&self.load(Ordering::Relaxed))
            .finish()
    }
}
