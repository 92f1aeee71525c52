use std::io::{self, Write};

use bench_support::{AllocationError, DRIFT_THRESHOLD, footprint_mib, is_drift};
use itertools::Itertools;

use crate::{HarnessConfig, ScalingReport, SizeReport, Strategy};

const RULE_WIDTH: usize = 88;

pub(crate) fn write_preamble(out: &mut impl Write, config: &HarnessConfig) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "PARALLEL REDUCTION BENCHMARK")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "Number of threads: {}", config.workers())?;
    writeln!(out, "Number of trials per method: {}", config.trials())?;
    writeln!(
        out,
        "Array sizes: {}",
        config.sizes().iter().map(|&size| grouped(size)).join(", ")
    )?;
    writeln!(out, "Methods: {}", Strategy::ALL.iter().join(", "))
}

pub(crate) fn write_size(out: &mut impl Write, report: &SizeReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "ARRAY SIZE: {} elements", grouped(report.size()))?;
    writeln!(out, "Memory usage: ~{:.2} MB", footprint_mib(report.size()))?;
    writeln!(
        out,
        "Sequential sum: {:.6} (time: {:.6} s)",
        report.reference(),
        report.reference_seconds()
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(
        out,
        "{:<18} | {:>12} | {:>10} | {:>22} | {:>12}",
        "Method", "Time (s)", "Speedup", "Result", "Rel. error"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

    for summary in report.summaries() {
        let drift_marker = if is_drift(summary.relative_error()) {
            "  DRIFT"
        } else {
            ""
        };

        writeln!(
            out,
            "{:<18} | {:>12.6} | {:>10} | {:>22.6} | {:>12.2e}{drift_marker}",
            summary.strategy().to_string(),
            summary.mean_seconds(),
            speedup_cell(summary.speedup()),
            summary.sum(),
            summary.relative_error(),
        )?;
    }

    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(
        out,
        "Times are the mean of {} trial(s). Speedup is the Reduction time divided by the method time.",
        report.trials()
    )?;

    if report.has_drift() {
        writeln!(
            out,
            "DRIFT marks results whose relative error exceeds {DRIFT_THRESHOLD:e}."
        )?;
    }

    Ok(())
}

pub(crate) fn write_skipped(
    out: &mut impl Write,
    size: usize,
    error: &AllocationError,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "ARRAY SIZE: {} elements", grouped(size))?;
    writeln!(
        out,
        "Memory allocation failed ({error}), skipping this size."
    )
}

pub(crate) fn write_scaling(out: &mut impl Write, report: &ScalingReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(
        out,
        "THREAD SCALING at {} elements",
        grouped(report.size())
    )?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

    if let Some(baseline) = report.baseline() {
        writeln!(
            out,
            "Speedup is the Reduction time with {} thread(s) divided by the Reduction time with N threads.",
            baseline.width()
        )?;
    }

    write!(out, "{:>8}", "Threads")?;
    for strategy in Strategy::ALL {
        write!(out, " | {:>16}", strategy.to_string())?;
    }
    writeln!(out, " | {:>8}", "Speedup")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH.saturating_add(24)))?;

    for row in report.rows() {
        write!(out, "{:>8}", row.width())?;

        for strategy in Strategy::ALL {
            match row.seconds(strategy) {
                Some(seconds) => write!(out, " | {seconds:>16.6}")?,
                None => write!(out, " | {:>16}", "n/a")?,
            }
        }

        writeln!(out, " | {:>8}", speedup_cell(report.speedup(row)))?;
    }

    Ok(())
}

pub(crate) fn write_conclusions(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "CONCLUSIONS")?;
    writeln!(
        out,
        "- Reduction keeps one private partial per worker and merges once per worker, which is why it is the baseline."
    )?;
    writeln!(
        out,
        "- Critical Section and Lock also merge once per worker, so their cost is expected to stay close to Reduction."
    )?;
    writeln!(
        out,
        "- Atomic synchronizes on every element; contention on one memory location makes it the slowest method."
    )?;
    writeln!(
        out,
        "- Manual uses blocks of N/W elements and gives the remainder to the last worker, so its balance depends on N."
    )?;
    writeln!(
        out,
        "- Rel. error compares each result with the sequential sum. Values far below {DRIFT_THRESHOLD:e} come from the changed summation order."
    )
}

fn speedup_cell(speedup: Option<f64>) -> String {
    speedup.map_or_else(|| "n/a".to_owned(), |speedup| format!("{speedup:.2}x"))
}

/// Formats an integer with a comma between every group of three digits.
fn grouped(value: usize) -> String {
    value
        .to_string()
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(String::from_utf8_lossy)
        .join(",")
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use new_zealand::nz;

    use super::*;

    #[test]
    fn digit_grouping() {
        assert_eq!(grouped(0), "0");
        assert_eq!(grouped(999), "999");
        assert_eq!(grouped(1_000), "1,000");
        assert_eq!(grouped(50_000_000), "50,000,000");
    }

    #[test]
    fn missing_speedup() {
        assert_eq!(speedup_cell(None), "n/a");
        assert_eq!(speedup_cell(Some(1.5)), "1.50x");
    }

    #[test]
    fn preamble_lists_configuration() {
        let config = HarnessConfig::default()
            .with_sizes(vec![1_000, 10_000])
            .with_workers(nz!(4));
        let mut out = Vec::new();

        write_preamble(&mut out, &config).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Number of threads: 4"));
        assert!(text.contains("Array sizes: 1,000, 10,000"));
        assert!(text.contains("Reduction, Critical Section, Atomic, Manual, Lock"));
    }

    #[test]
    fn skipped_size_names_the_failure() {
        let error = bench_support::try_zeroed(usize::MAX).unwrap_err();
        let mut out = Vec::new();

        write_skipped(&mut out, usize::MAX, &error).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Memory allocation failed"));
        assert!(text.contains("skipping this size"));
    }
}
