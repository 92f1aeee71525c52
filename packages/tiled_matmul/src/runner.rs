use std::num::NonZero;

use bench_support::{AllocationError, Clock, DEFAULT_SEED, RandomFill, footprint_mib};
use par_region::WorkerPool;
use tracing::{debug, info, warn};

use crate::{
    Config, Matrix, QUICK_CHUNK, QUICK_SCHEDULE, Reporter, Result, Schedule, Sweep, TilePlan,
};

/// The parameters of one timed multiplication.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Experiment {
    size: NonZero<usize>,
    threads: NonZero<usize>,
    chunk: NonZero<usize>,
    schedule: Schedule,
}

impl Experiment {
    /// Describes a multiplication of two `size` x `size` matrices on `threads` workers.
    #[must_use]
    pub fn new(
        size: NonZero<usize>,
        threads: NonZero<usize>,
        chunk: NonZero<usize>,
        schedule: Schedule,
    ) -> Self {
        Self {
            size,
            threads,
            chunk,
            schedule,
        }
    }

    /// Matrix side.
    #[must_use]
    pub fn size(&self) -> NonZero<usize> {
        self.size
    }

    /// Worker count.
    #[must_use]
    pub fn threads(&self) -> NonZero<usize> {
        self.threads
    }

    /// Tile height in rows.
    #[must_use]
    pub fn chunk(&self) -> NonZero<usize> {
        self.chunk
    }

    /// Tile distribution policy.
    #[must_use]
    pub fn schedule(&self) -> Schedule {
        self.schedule
    }
}

/// A completed experiment and the seconds its multiplication took.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExperimentResult {
    experiment: Experiment,
    seconds: f64,
}

impl ExperimentResult {
    /// Records that `experiment` took `seconds`.
    #[must_use]
    pub fn new(experiment: Experiment, seconds: f64) -> Self {
        Self {
            experiment,
            seconds,
        }
    }

    /// What was measured.
    #[must_use]
    pub fn experiment(&self) -> &Experiment {
        &self.experiment
    }

    /// Wall time from region entry to the join of the last worker.
    #[must_use]
    pub fn seconds(&self) -> f64 {
        self.seconds
    }
}

/// How many experiments of a sweep completed and how many were skipped.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    completed: usize,
    skipped: usize,
}

impl RunSummary {
    /// Experiments that produced a measurement.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Experiments whose matrices could not be allocated.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Whether at least one experiment produced a measurement.
    #[must_use]
    pub fn any_completed(&self) -> bool {
        self.completed > 0
    }
}

/// Runs the sweep described by a [`Config`].
///
/// Every experiment allocates and fills its own matrices, so a size that does not fit in
/// memory is skipped without affecting the others.
#[derive(Debug)]
pub struct Runner {
    config: Config,
    clock: Clock,
}

impl Runner {
    /// Creates a runner for `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            clock: Clock::new(),
        }
    }

    /// The configuration this runner sweeps.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs every experiment of the configured sweep, in order, and reports each to `reporter`.
    ///
    /// # Errors
    ///
    /// Fails if a parallel region cannot be started or the reporter cannot write. Nothing is
    /// reported for the experiment whose region failed.
    pub fn run(&self, reporter: &mut impl Reporter) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        reporter.begin(&self.config)?;

        match self.config.sweep() {
            Sweep::Quick => {
                for &size in self.config.sizes() {
                    for &threads in self.config.threads() {
                        let experiment =
                            Experiment::new(size, threads, QUICK_CHUNK, QUICK_SCHEDULE);
                        self.run_and_report(experiment, reporter, &mut summary)?;
                    }
                }
            }
            Sweep::Comprehensive => {
                for &size in self.config.sizes() {
                    reporter.size_started(size)?;

                    for &schedule in self.config.schedules() {
                        reporter.schedule_started(schedule)?;

                        for &chunk in self.config.chunks() {
                            reporter.chunk_started(chunk)?;

                            for &threads in self.config.threads() {
                                let experiment = Experiment::new(size, threads, chunk, schedule);
                                self.run_and_report(experiment, reporter, &mut summary)?;
                            }

                            reporter.chunk_finished()?;
                        }
                    }
                }
            }
        }

        info!(
            completed = summary.completed,
            skipped = summary.skipped,
            "sweep finished"
        );

        Ok(summary)
    }

    /// Allocates and fills the matrices of `experiment` and plans its tiles, then times the
    /// multiplication.
    ///
    /// Returns `Ok(None)` if the matrices cannot be allocated.
    ///
    /// # Errors
    ///
    /// Fails if the parallel region cannot be started.
    pub fn run_experiment(&self, experiment: Experiment) -> Result<Option<ExperimentResult>> {
        let size = experiment.size.get();

        let (a, b, mut c) = match allocate(size) {
            Ok(matrices) => matrices,
            Err(error) => {
                warn!(
                    size,
                    mib_per_matrix = footprint_mib(size.saturating_mul(size)),
                    %error,
                    "skipping experiment whose matrices cannot be allocated"
                );
                return Ok(None);
            }
        };

        let pool = WorkerPool::new(experiment.threads);

        let plan = TilePlan::new(&mut c, pool.width(), experiment.chunk, experiment.schedule);

        let start = self.clock.now();
        plan.execute(&pool, &a, &b)?;
        let seconds = self.clock.now() - start;

        debug!(
            size,
            threads = experiment.threads.get(),
            chunk = experiment.chunk.get(),
            schedule = %experiment.schedule,
            seconds,
            "experiment finished"
        );

        Ok(Some(ExperimentResult::new(experiment, seconds)))
    }

    fn run_and_report(
        &self,
        experiment: Experiment,
        reporter: &mut impl Reporter,
        summary: &mut RunSummary,
    ) -> Result<()> {
        match self.run_experiment(experiment)? {
            Some(result) => {
                summary.completed = summary.completed.saturating_add(1);
                reporter.experiment(&result)?;
            }
            None => {
                summary.skipped = summary.skipped.saturating_add(1);
                reporter.skipped(&experiment)?;
            }
        }

        Ok(())
    }
}

/// Allocates `a` and `b` filled with random values and a zeroed `c`.
fn allocate(size: usize) -> std::result::Result<(Matrix, Matrix, Matrix), AllocationError> {
    let mut fill = RandomFill::seeded(DEFAULT_SEED);

    let mut a = Matrix::zeroed(size)?;
    a.fill_random(&mut fill);

    let mut b = Matrix::zeroed(size)?;
    b.fill_random(&mut fill);

    let c = Matrix::zeroed(size)?;

    Ok((a, b, c))
}
