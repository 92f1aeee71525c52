/// Relative error above which a parallel sum is considered to have drifted from the reference.
///
/// Reordering a double-precision summation changes the result by a few ULPs at most, so any
/// error this large points at an element that was lost or counted twice.
pub const DRIFT_THRESHOLD: f64 = 1e-6;

/// The relative error `|observed − expected| / max(1, |expected|)`.
///
/// Using `max(1, |expected|)` as the denominator makes the metric well defined for a zero
/// reference, where it degrades to the absolute error.
///
/// # Examples
///
/// ```
/// use bench_support::relative_error;
///
/// assert_eq!(relative_error(10.0, 10.0), 0.0);
/// assert_eq!(relative_error(0.25, 0.0), 0.25);
/// ```
#[must_use]
pub fn relative_error(observed: f64, expected: f64) -> f64 {
    (observed - expected).abs() / expected.abs().max(1.0)
}

/// Whether a relative error indicates a correctness bug rather than rounding noise.
#[must_use]
pub fn is_drift(relative_error: f64) -> bool {
    relative_error.is_nan() || relative_error > DRIFT_THRESHOLD
}
