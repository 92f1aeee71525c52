#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))] // This is all test code, no need to test it.

//! Private helpers for testing the parallel benchmark packages.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use bench_support::relative_error;

/// How long a test may run before [`with_watchdog()`] declares it hung.
///
/// Parallel regions that deadlock on a lock or a dynamic-schedule cursor never return, so the
/// concurrency tests need an upper bound. Miri is far slower at thread synchronization and
/// receives a more generous limit.
const TIMEOUT: Duration = if cfg!(miri) {
    Duration::from_secs(120)
} else {
    Duration::from_secs(30)
};

/// Runs `test_fn` on a separate thread and fails the test if it does not finish in time.
///
/// Panics raised by `test_fn` are propagated unchanged, so `#[should_panic]` tests keep working.
///
/// # Panics
///
/// Panics if `test_fn` exceeds the timeout.
///
/// # Example
///
/// ```rust
/// use testing::with_watchdog;
///
/// let answer = with_watchdog(|| 6 * 7);
/// assert_eq!(answer, 42);
/// ```
pub fn with_watchdog<F, R>(test_fn: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    let test_thread = thread::spawn(move || {
        // The receiver is gone only if the watchdog has already fired.
        drop(tx.send(test_fn()));
    });

    match rx.recv_timeout(TIMEOUT) {
        Ok(result) => {
            test_thread.join().expect("test thread already produced a result");
            result
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            panic!("test did not finish within {TIMEOUT:?}, a parallel region is likely hung")
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => match test_thread.join() {
            Ok(()) => panic!("test thread exited without producing a result"),
            Err(payload) => std::panic::resume_unwind(payload),
        },
    }
}

/// Asserts that `observed` is within `tolerance` relative error of `expected`.
///
/// # Panics
///
/// Panics if the relative error exceeds `tolerance`.
#[track_caller]
pub fn assert_close(observed: f64, expected: f64, tolerance: f64) {
    let error = relative_error(observed, expected);

    assert!(
        error <= tolerance,
        "{observed} is not within {tolerance:e} of {expected} (relative error {error:e})"
    );
}

/// Asserts that two equally long slices are element-wise within `tolerance` relative error.
///
/// # Panics
///
/// Panics if the lengths differ or any pair of elements is too far apart.
#[track_caller]
pub fn assert_all_close(observed: &[f64], expected: &[f64], tolerance: f64) {
    assert_eq!(observed.len(), expected.len(), "length mismatch");

    for (index, (&actual, &wanted)) in observed.iter().zip(expected).enumerate() {
        let error = relative_error(actual, wanted);

        assert!(
            error <= tolerance,
            "element {index}: {actual} is not within {tolerance:e} of {wanted}"
        );
    }
}
