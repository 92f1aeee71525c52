use std::io::Write;
use std::num::NonZero;

use bench_support::{
    ARRAY_VALUE_LIMIT, AllocationError, Clock, RandomFill, footprint_mib, is_drift,
    relative_error, try_zeroed,
};
use par_region::WorkerPool;
use tracing::{debug, trace, warn};

use crate::{
    HarnessConfig, ReductionTrial, Result, Strategy, StrategySummary, report, sequential_sum,
    summarize,
};

/// Measurements of all strategies at one array size.
#[derive(Clone, Debug)]
pub struct SizeReport {
    size: usize,
    width: NonZero<usize>,
    trials: NonZero<usize>,
    reference: f64,
    reference_seconds: f64,
    summaries: Vec<StrategySummary>,
}

impl SizeReport {
    /// Number of array elements.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Worker count every strategy ran with.
    #[must_use]
    pub fn width(&self) -> NonZero<usize> {
        self.width
    }

    /// Trials per strategy.
    #[must_use]
    pub fn trials(&self) -> NonZero<usize> {
        self.trials
    }

    /// The sequential sum all parallel sums are compared against.
    #[must_use]
    pub fn reference(&self) -> f64 {
        self.reference
    }

    /// Seconds the sequential sum took.
    #[must_use]
    pub fn reference_seconds(&self) -> f64 {
        self.reference_seconds
    }

    /// One entry per strategy, in [`Strategy::ALL`] order.
    #[must_use]
    pub fn summaries(&self) -> &[StrategySummary] {
        &self.summaries
    }

    /// Whether any strategy drifted from the sequential reference.
    #[must_use]
    pub fn has_drift(&self) -> bool {
        self.summaries.iter().any(|s| is_drift(s.relative_error()))
    }
}

/// Result of measuring one array size.
#[derive(Debug)]
#[non_exhaustive]
pub enum SizeOutcome {
    /// Every strategy ran to completion.
    Measured(SizeReport),

    /// The array could not be allocated, so nothing was measured.
    Skipped {
        /// Requested array size.
        size: usize,

        /// Why the allocation failed.
        error: AllocationError,
    },
}

/// Wall time of every strategy at one worker count.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalingRow {
    width: NonZero<usize>,
    seconds: Vec<(Strategy, f64)>,
}

impl ScalingRow {
    /// Worker count of this row.
    #[must_use]
    pub fn width(&self) -> NonZero<usize> {
        self.width
    }

    /// Seconds `strategy` took at this worker count, if it was measured.
    #[must_use]
    pub fn seconds(&self, strategy: Strategy) -> Option<f64> {
        self.seconds
            .iter()
            .find(|(measured, _)| *measured == strategy)
            .map(|(_, seconds)| *seconds)
    }
}

/// Measurements of all strategies over a range of worker counts at a fixed array size.
///
/// Speedup in this report is scaling speedup: the [`Strategy::Reduction`] time of the baseline
/// row divided by the [`Strategy::Reduction`] time of another row. The baseline is the row with
/// one worker, or the first row if one worker was not measured.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalingReport {
    size: usize,
    rows: Vec<ScalingRow>,
}

impl ScalingReport {
    /// Number of array elements.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// One row per measured worker count, in configuration order.
    #[must_use]
    pub fn rows(&self) -> &[ScalingRow] {
        &self.rows
    }

    /// The row all speedups are relative to.
    #[must_use]
    pub fn baseline(&self) -> Option<&ScalingRow> {
        self.rows
            .iter()
            .find(|row| row.width.get() == 1)
            .or_else(|| self.rows.first())
    }

    /// Scaling speedup of `row` relative to [`baseline()`][Self::baseline].
    #[must_use]
    pub fn speedup(&self, row: &ScalingRow) -> Option<f64> {
        let baseline = self.baseline()?.seconds(Strategy::Reduction)?;
        crate::trial::ratio(baseline, row.seconds(Strategy::Reduction)?)
    }
}

/// Result of the worker count sweep.
#[derive(Debug)]
#[non_exhaustive]
pub enum ScalingOutcome {
    /// Every worker count was measured.
    Measured(ScalingReport),

    /// The array could not be allocated, so nothing was measured.
    Skipped {
        /// Requested array size.
        size: usize,

        /// Why the allocation failed.
        error: AllocationError,
    },
}

/// Runs the reduction benchmark and writes its report.
///
/// # Examples
///
/// ```
/// use new_zealand::nz;
/// use reduction_bench::{Harness, HarnessConfig};
///
/// let config = HarnessConfig::default()
///     .with_sizes(vec![1_000])
///     .with_trials(nz!(1))
///     .with_workers(nz!(2))
///     .with_scaling(1_000, vec![nz!(1), nz!(2)]);
///
/// let mut report = Vec::new();
/// Harness::new(config).run(&mut report).unwrap();
///
/// assert!(String::from_utf8(report).unwrap().contains("Critical Section"));
/// ```
#[derive(Debug)]
pub struct Harness {
    config: HarnessConfig,
    clock: Clock,
}

impl Harness {
    /// Creates a harness for the given configuration.
    #[must_use]
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            clock: Clock::new(),
        }
    }

    /// The configuration this harness runs.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Runs the size sweep and then the worker count sweep, writing the report to `out` as
    /// results become available.
    ///
    /// Sizes whose array cannot be allocated are reported as skipped and the sweep continues.
    ///
    /// # Errors
    ///
    /// Fails if a parallel region cannot be started or the report cannot be written. Results of
    /// the size being measured when a region fails are not written.
    pub fn run(&self, out: &mut impl Write) -> Result<()> {
        report::write_preamble(out, &self.config)?;

        let pool = WorkerPool::new(self.config.workers());

        for &size in self.config.sizes() {
            match self.measure_size(&pool, size)? {
                SizeOutcome::Measured(measured) => report::write_size(out, &measured)?,
                SizeOutcome::Skipped { size, error } => report::write_skipped(out, size, &error)?,
            }
            out.flush()?;
        }

        match self.measure_scaling()? {
            Some(ScalingOutcome::Measured(scaling)) => report::write_scaling(out, &scaling)?,
            Some(ScalingOutcome::Skipped { size, error }) => {
                report::write_skipped(out, size, &error)?;
            }
            None => {}
        }

        report::write_conclusions(out)?;
        out.flush()?;

        Ok(())
    }

    /// Measures every strategy on an array of `size` random elements.
    ///
    /// # Errors
    ///
    /// Fails if a parallel region cannot be started.
    pub fn measure_size(&self, pool: &WorkerPool, size: usize) -> Result<SizeOutcome> {
        let values = match self.random_array(size) {
            Ok(values) => values,
            Err(error) => return Ok(SizeOutcome::Skipped { size, error }),
        };

        let (reference, reference_seconds) = self.clock.measure(|| sequential_sum(&values));

        let trial_count = self.config.trials().get();
        let mut trials = Vec::with_capacity(Strategy::ALL.len().saturating_mul(trial_count));

        for strategy in Strategy::ALL {
            for trial_index in 0..trial_count {
                let outcome = strategy.execute(pool, &values)?;

                trace!(
                    %strategy,
                    size,
                    trial_index,
                    seconds = outcome.seconds(),
                    "trial finished"
                );

                trials.push(ReductionTrial::new(
                    strategy,
                    size,
                    pool.width(),
                    trial_index,
                    outcome,
                ));
            }
        }

        let summaries = summarize(&trials, reference);

        for summary in &summaries {
            if is_drift(summary.relative_error()) {
                warn!(
                    strategy = %summary.strategy(),
                    size,
                    relative_error = summary.relative_error(),
                    "parallel sum drifted from the sequential reference"
                );
            }
        }

        debug!(size, width = pool.width().get(), "array size measured");

        Ok(SizeOutcome::Measured(SizeReport {
            size,
            width: pool.width(),
            trials: self.config.trials(),
            reference,
            reference_seconds,
            summaries,
        }))
    }

    /// Measures every strategy once per configured worker count on the scaling array.
    ///
    /// Returns `None` if no worker counts are configured.
    ///
    /// # Errors
    ///
    /// Fails if a parallel region cannot be started.
    pub fn measure_scaling(&self) -> Result<Option<ScalingOutcome>> {
        if self.config.scaling_widths().is_empty() {
            return Ok(None);
        }

        let size = self.config.scaling_size();

        let values = match self.random_array(size) {
            Ok(values) => values,
            Err(error) => return Ok(Some(ScalingOutcome::Skipped { size, error })),
        };

        let reference = sequential_sum(&values);
        let mut rows = Vec::with_capacity(self.config.scaling_widths().len());

        for &width in self.config.scaling_widths() {
            let pool = WorkerPool::new(width);
            let mut seconds = Vec::with_capacity(Strategy::ALL.len());

            for strategy in Strategy::ALL {
                let outcome = strategy.execute(&pool, &values)?;

                let error = relative_error(outcome.sum(), reference);
                if is_drift(error) {
                    warn!(
                        %strategy,
                        size,
                        width = width.get(),
                        relative_error = error,
                        "parallel sum drifted from the sequential reference"
                    );
                }

                seconds.push((strategy, outcome.seconds()));
            }

            debug!(size, width = width.get(), "worker count measured");

            rows.push(ScalingRow { width, seconds });
        }

        Ok(Some(ScalingOutcome::Measured(ScalingReport { size, rows })))
    }

    fn random_array(&self, size: usize) -> std::result::Result<Vec<f64>, AllocationError> {
        let mut values = try_zeroed(size).inspect_err(|error| {
            warn!(
                size,
                mib = footprint_mib(size),
                %error,
                "skipping array size that cannot be allocated"
            );
        })?;

        RandomFill::seeded(self.config.seed()).fill(&mut values, ARRAY_VALUE_LIMIT);

        Ok(values)
    }
}
