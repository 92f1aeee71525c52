use std::num::NonZero;

use bench_support::DEFAULT_SEED;
use new_zealand::nz;

/// Array sizes of the default size sweep.
const DEFAULT_SIZES: [usize; 6] = [1_000, 10_000, 100_000, 1_000_000, 10_000_000, 50_000_000];

/// Array size of the default worker count sweep.
const DEFAULT_SCALING_SIZE: usize = 10_000_000;

/// Parameters of a [`Harness`][crate::Harness] run.
///
/// The default describes the full benchmark. Tests and quick experiments shrink it with the
/// `with_*` methods.
///
/// # Examples
///
/// ```
/// use new_zealand::nz;
/// use reduction_bench::HarnessConfig;
///
/// let config = HarnessConfig::default()
///     .with_sizes(vec![1_000, 2_000])
///     .with_trials(nz!(1));
///
/// assert_eq!(config.sizes(), [1_000, 2_000]);
/// assert_eq!(config.trials().get(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    sizes: Vec<usize>,
    trials: NonZero<usize>,
    workers: NonZero<usize>,
    scaling_size: usize,
    scaling_widths: Vec<NonZero<usize>>,
    seed: u64,
}

impl HarnessConfig {
    /// Array sizes measured by the size sweep, in order.
    #[must_use]
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// How many times each strategy runs per size. Reported times are the mean.
    #[must_use]
    pub fn trials(&self) -> NonZero<usize> {
        self.trials
    }

    /// Worker count of the size sweep.
    #[must_use]
    pub fn workers(&self) -> NonZero<usize> {
        self.workers
    }

    /// Array size of the worker count sweep.
    #[must_use]
    pub fn scaling_size(&self) -> usize {
        self.scaling_size
    }

    /// Worker counts of the worker count sweep, in order. Empty disables the sweep.
    #[must_use]
    pub fn scaling_widths(&self) -> &[NonZero<usize>] {
        &self.scaling_widths
    }

    /// Seed of the generator that fills the arrays.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Replaces the array sizes of the size sweep.
    #[must_use]
    pub fn with_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.sizes = sizes;
        self
    }

    /// Replaces the number of trials per strategy and size.
    #[must_use]
    pub fn with_trials(mut self, trials: NonZero<usize>) -> Self {
        self.trials = trials;
        self
    }

    /// Replaces the worker count of the size sweep.
    #[must_use]
    pub fn with_workers(mut self, workers: NonZero<usize>) -> Self {
        self.workers = workers;
        self
    }

    /// Replaces the array size and worker counts of the worker count sweep.
    #[must_use]
    pub fn with_scaling(mut self, size: usize, widths: Vec<NonZero<usize>>) -> Self {
        self.scaling_size = size;
        self.scaling_widths = widths;
        self
    }

    /// Replaces the fill seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            trials: nz!(3),
            workers: nz!(8),
            scaling_size: DEFAULT_SCALING_SIZE,
            scaling_widths: vec![nz!(1), nz!(2), nz!(4), nz!(8), nz!(16)],
            seed: DEFAULT_SEED,
        }
    }
}
