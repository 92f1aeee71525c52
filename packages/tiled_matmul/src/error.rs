use std::io;

use par_region::RegionError;
use thiserror::Error;

/// Errors that abort a benchmark run.
///
/// An experiment whose matrices cannot be allocated is skipped instead and does not produce an
/// error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A parallel region could not be started.
    #[error(transparent)]
    Region(#[from] RegionError),

    /// Results could not be written.
    #[error("failed to write benchmark results")]
    Output(#[from] io::Error),
}

/// A command line value was rejected.
#[derive(Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum ArgumentError {
    /// A comma-separated list had no elements.
    #[error("the list is empty")]
    EmptyList,

    /// A list element was not a non-negative integer.
    #[error("'{value}' is not a number")]
    InvalidNumber {
        /// The rejected element.
        value: String,
    },

    /// A list element was zero where only positive values are meaningful.
    #[error("values must be greater than zero")]
    ZeroValue,

    /// A schedule name was neither `static` nor `dynamic`.
    #[error("unknown schedule '{name}', expected 'static' or 'dynamic'")]
    UnknownSchedule {
        /// The rejected name.
        name: String,
    },
}

/// A specialized `Result` type for benchmark operations, returning the crate's [`Error`] type
/// as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);
    assert_impl_all!(ArgumentError: Send, Sync, Debug);

    #[test]
    fn argument_errors_name_the_value() {
        let error = ArgumentError::UnknownSchedule {
            name: "guided".to_owned(),
        };

        assert!(error.to_string().contains("'guided'"));
    }
}
