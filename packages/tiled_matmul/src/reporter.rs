use std::io::{self, Write};
use std::num::NonZero;

use itertools::Itertools;

use crate::{Config, Experiment, ExperimentResult, Schedule, Sweep};

/// Header line of the CSV output.
pub const CSV_HEADER: &str = "size,threads,chunk,schedule,time";

/// Receives the progress of a [`Runner`][crate::Runner] and turns it into output.
///
/// The section callbacks are only made by the comprehensive sweep, in the nesting order of the
/// sweep. Their default implementations do nothing.
pub trait Reporter {
    /// Called once before any experiment runs.
    ///
    /// # Errors
    ///
    /// Fails if the output cannot be written.
    fn begin(&mut self, config: &Config) -> io::Result<()>;

    /// Called when the comprehensive sweep moves on to a new matrix size.
    ///
    /// # Errors
    ///
    /// Fails if the output cannot be written.
    fn size_started(&mut self, _size: NonZero<usize>) -> io::Result<()> {
        Ok(())
    }

    /// Called when the comprehensive sweep moves on to a new schedule.
    ///
    /// # Errors
    ///
    /// Fails if the output cannot be written.
    fn schedule_started(&mut self, _schedule: Schedule) -> io::Result<()> {
        Ok(())
    }

    /// Called when the comprehensive sweep moves on to a new chunk size.
    ///
    /// # Errors
    ///
    /// Fails if the output cannot be written.
    fn chunk_started(&mut self, _chunk: NonZero<usize>) -> io::Result<()> {
        Ok(())
    }

    /// Called after all thread counts of a chunk size have been measured.
    ///
    /// # Errors
    ///
    /// Fails if the output cannot be written.
    fn chunk_finished(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Called with the measurement of every completed experiment.
    ///
    /// # Errors
    ///
    /// Fails if the output cannot be written.
    fn experiment(&mut self, result: &ExperimentResult) -> io::Result<()>;

    /// Called for every experiment whose matrices could not be allocated.
    ///
    /// # Errors
    ///
    /// Fails if the output cannot be written.
    fn skipped(&mut self, _experiment: &Experiment) -> io::Result<()> {
        Ok(())
    }
}

/// Writes a header line followed by one `size,threads,chunk,schedule,time` row per experiment.
///
/// Skipped experiments produce no row, so every row is a real measurement.
#[derive(Debug)]
pub struct CsvReporter<W> {
    out: W,
}

impl<W: Write> CsvReporter<W> {
    /// Creates a reporter that writes to `out`.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for CsvReporter<W> {
    fn begin(&mut self, _config: &Config) -> io::Result<()> {
        writeln!(self.out, "{CSV_HEADER}")
    }

    fn experiment(&mut self, result: &ExperimentResult) -> io::Result<()> {
        let experiment = result.experiment();

        writeln!(
            self.out,
            "{},{},{},{},{:.4}",
            experiment.size(),
            experiment.threads(),
            experiment.chunk(),
            experiment.schedule(),
            result.seconds()
        )?;
        self.out.flush()
    }
}

/// Writes one human-readable line per experiment, with banners and section headers.
#[derive(Debug)]
pub struct VerboseReporter<W> {
    out: W,
}

impl<W: Write> VerboseReporter<W> {
    /// Creates a reporter that writes to `out`.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_experiment_prefix(&mut self, experiment: &Experiment) -> io::Result<()> {
        write!(
            self.out,
            "Size: {:4}, Threads: {:2}, Chunk: {:3}, Schedule: {}, ",
            experiment.size(),
            experiment.threads(),
            experiment.chunk(),
            experiment.schedule().title()
        )
    }
}

impl<W: Write> Reporter for VerboseReporter<W> {
    fn begin(&mut self, config: &Config) -> io::Result<()> {
        match config.sweep() {
            Sweep::Quick => {
                writeln!(self.out, "=== Quick Parallel Matrix Multiplication Test ===")?;
                writeln!(self.out, "Testing basic configurations...")?;
            }
            Sweep::Comprehensive => {
                writeln!(
                    self.out,
                    "=== Comprehensive Parallel Matrix Multiplication Test ==="
                )?;
                writeln!(self.out, "Matrix sizes: {}", config.sizes().iter().join(" "))?;
                writeln!(self.out, "Thread counts: {}", config.threads().iter().join(" "))?;
                writeln!(self.out, "Chunk sizes: {}", config.chunks().iter().join(" "))?;
                writeln!(
                    self.out,
                    "Schedule types: {}",
                    config.schedules().iter().join(" ")
                )?;
            }
        }

        writeln!(self.out)
    }

    fn size_started(&mut self, size: NonZero<usize>) -> io::Result<()> {
        writeln!(self.out, "--- Matrix Size: {size}x{size} ---")
    }

    fn schedule_started(&mut self, schedule: Schedule) -> io::Result<()> {
        writeln!(self.out, "Schedule: {}", schedule.title())
    }

    fn chunk_started(&mut self, chunk: NonZero<usize>) -> io::Result<()> {
        writeln!(self.out, "  Chunk Size: {chunk}")
    }

    fn chunk_finished(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    fn experiment(&mut self, result: &ExperimentResult) -> io::Result<()> {
        self.write_experiment_prefix(result.experiment())?;
        writeln!(self.out, "Time: {:.4} sec", result.seconds())?;
        self.out.flush()
    }

    fn skipped(&mut self, experiment: &Experiment) -> io::Result<()> {
        self.write_experiment_prefix(experiment)?;
        writeln!(self.out, "skipped (matrices could not be allocated)")?;
        self.out.flush()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use new_zealand::nz;

    use super::*;

    fn result() -> ExperimentResult {
        ExperimentResult::new(
            Experiment::new(nz!(256), nz!(4), nz!(16), Schedule::Dynamic),
            0.123_456,
        )
    }

    #[test]
    fn csv_rows() {
        let mut reporter = CsvReporter::new(Vec::new());

        reporter.begin(&Config::default()).unwrap();
        reporter.experiment(&result()).unwrap();
        reporter
            .skipped(&Experiment::new(nz!(8), nz!(1), nz!(1), Schedule::Static))
            .unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(text, "size,threads,chunk,schedule,time\n256,4,16,dynamic,0.1235\n");
    }

    #[test]
    fn verbose_line_is_aligned() {
        let mut reporter = VerboseReporter::new(Vec::new());

        reporter.experiment(&result()).unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            text,
            "Size:  256, Threads:  4, Chunk:  16, Schedule: Dynamic, Time: 0.1235 sec\n"
        );
    }

    #[test]
    fn verbose_comprehensive_banner_lists_parameters() {
        let config = Config::parse("tiled_matmul", &["-a", "-v", "--schedule", "static,dynamic"])
            .unwrap();
        let mut reporter = VerboseReporter::new(Vec::new());

        reporter.begin(&config).unwrap();
        reporter.size_started(nz!(64)).unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.starts_with("=== Comprehensive Parallel Matrix Multiplication Test ==="));
        assert!(text.contains("Matrix sizes: 256 512 1024\n"));
        assert!(text.contains("Schedule types: static dynamic\n"));
        assert!(text.ends_with("--- Matrix Size: 64x64 ---\n"));
    }
}
