use std::num::NonZero;

use bench_support::relative_error;

use crate::{KernelOutcome, Strategy};

/// One timed execution of a strategy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReductionTrial {
    strategy: Strategy,
    len: usize,
    width: NonZero<usize>,
    trial_index: usize,
    outcome: KernelOutcome,
}

impl ReductionTrial {
    /// Records the outcome of trial `trial_index` of `strategy` on `len` elements and `width`
    /// workers.
    #[must_use]
    pub fn new(
        strategy: Strategy,
        len: usize,
        width: NonZero<usize>,
        trial_index: usize,
        outcome: KernelOutcome,
    ) -> Self {
        Self {
            strategy,
            len,
            width,
            trial_index,
            outcome,
        }
    }

    /// The strategy that was executed.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Number of summed elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the summed array was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of workers in the region.
    #[must_use]
    pub fn width(&self) -> NonZero<usize> {
        self.width
    }

    /// Zero-based repetition number.
    #[must_use]
    pub fn trial_index(&self) -> usize {
        self.trial_index
    }

    /// Seconds the kernel took.
    #[must_use]
    pub fn seconds(&self) -> f64 {
        self.outcome.seconds()
    }

    /// Sum the kernel produced.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.outcome.sum()
    }
}

/// Aggregated trials of one strategy at one array size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrategySummary {
    strategy: Strategy,
    mean_seconds: f64,
    speedup: Option<f64>,
    sum: f64,
    relative_error: f64,
}

impl StrategySummary {
    /// The strategy that was executed.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Mean wall time over all trials.
    #[must_use]
    pub fn mean_seconds(&self) -> f64 {
        self.mean_seconds
    }

    /// Mean time of [`Strategy::Reduction`] divided by the mean time of this strategy.
    ///
    /// `None` if either mean is zero or no reduction trial was recorded.
    #[must_use]
    pub fn speedup(&self) -> Option<f64> {
        self.speedup
    }

    /// Sum produced by the last trial.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Worst relative error over all trials, against the sequential reference.
    #[must_use]
    pub fn relative_error(&self) -> f64 {
        self.relative_error
    }
}

/// Aggregates trials per strategy, in [`Strategy::ALL`] order.
///
/// Strategies without any trial are left out.
#[must_use]
pub fn summarize(trials: &[ReductionTrial], reference: f64) -> Vec<StrategySummary> {
    let baseline = mean_seconds(trials, Strategy::Reduction);

    Strategy::ALL
        .into_iter()
        .filter_map(|strategy| {
            let mean_seconds = mean_seconds(trials, strategy)?;

            let of_strategy = trials.iter().filter(|t| t.strategy == strategy);
            let sum = of_strategy.clone().last()?.sum();
            let relative_error = of_strategy
                .map(|t| relative_error(t.sum(), reference))
                .fold(0.0, worst_error);

            Some(StrategySummary {
                strategy,
                mean_seconds,
                speedup: baseline.and_then(|baseline| ratio(baseline, mean_seconds)),
                sum,
                relative_error,
            })
        })
        .collect()
}

/// `numerator / denominator`, or `None` when the ratio would not be a finite positive number.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (numerator > 0.0 && denominator > 0.0).then(|| numerator / denominator)
}

fn mean_seconds(trials: &[ReductionTrial], strategy: Strategy) -> Option<f64> {
    let (total, count) = trials
        .iter()
        .filter(|t| t.strategy == strategy)
        .fold((0.0, 0.0), |(total, count), t| (total + t.seconds(), count + 1.0));

    (count > 0.0).then(|| total / count)
}

// NaN sticks, so a sum that turned into NaN is always reported as drift.
fn worst_error(worst: f64, error: f64) -> f64 {
    if worst.is_nan() || error.is_nan() {
        f64::NAN
    } else {
        worst.max(error)
    }
}
