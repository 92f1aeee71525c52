use std::io;

use tracing_subscriber::EnvFilter;

/// Filter directives used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "warn";

/// Installs the process-wide log subscriber of a benchmark binary.
///
/// Log records go to stderr so that stdout carries nothing but benchmark results. The verbosity
/// is controlled by `RUST_LOG` and defaults to warnings only. If a subscriber is already
/// installed, it is kept.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialization_is_harmless() {
        init_logging();
        init_logging();

        tracing::warn!("logging works after repeated initialization");
    }
}
