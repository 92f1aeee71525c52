//! End-to-end runs of the benchmark harness with a configuration small enough for a test.

use new_zealand::nz;
use reduction_bench::{Harness, HarnessConfig, SizeOutcome, Strategy};
use testing::with_watchdog;

fn small_config() -> HarnessConfig {
    HarnessConfig::default()
        .with_sizes(vec![0, 1_000, 4_097])
        .with_trials(nz!(2))
        .with_workers(nz!(3))
        .with_scaling(2_000, vec![nz!(1), nz!(2), nz!(4)])
}

#[cfg_attr(miri, ignore)]
#[test]
fn report_covers_every_size_and_strategy() {
    with_watchdog(|| {
        let mut out = Vec::new();

        Harness::new(small_config()).run(&mut out).unwrap();
        let report = String::from_utf8(out).unwrap();

        assert!(report.contains("PARALLEL REDUCTION BENCHMARK"));
        assert!(report.contains("Number of threads: 3"));

        for size in ["ARRAY SIZE: 0 elements", "ARRAY SIZE: 1,000", "ARRAY SIZE: 4,097"] {
            assert!(report.contains(size), "missing section {size}");
        }

        for strategy in Strategy::ALL {
            // Once per size table and once in the scaling header.
            let mentions = report.matches(&strategy.to_string()).count();
            assert!(mentions >= 4, "{strategy} mentioned only {mentions} times");
        }

        assert!(report.contains("THREAD SCALING at 2,000 elements"));
        assert!(report.contains("CONCLUSIONS"));
        assert!(!report.contains("DRIFT"));
    });
}

#[cfg_attr(miri, ignore)]
#[test]
fn measured_sizes_are_exact_for_reduction() {
    with_watchdog(|| {
        let harness = Harness::new(small_config());
        let pool = par_region::WorkerPool::new(nz!(3));

        let SizeOutcome::Measured(report) = harness.measure_size(&pool, 4_097).unwrap() else {
            panic!("a 4097 element array must be allocatable");
        };

        assert_eq!(report.size(), 4_097);
        assert_eq!(report.width().get(), 3);
        assert_eq!(report.summaries().len(), Strategy::ALL.len());
        assert!(!report.has_drift());

        let reduction = report.summaries().first().unwrap();
        assert_eq!(reduction.strategy(), Strategy::Reduction);
        assert_eq!(reduction.speedup(), Some(1.0));
    });
}

#[cfg_attr(miri, ignore)]
#[test]
fn scaling_rows_follow_configured_widths() {
    with_watchdog(|| {
        let harness = Harness::new(small_config());

        let Some(reduction_bench::ScalingOutcome::Measured(scaling)) =
            harness.measure_scaling().unwrap()
        else {
            panic!("scaling sweep is configured and small enough to allocate");
        };

        let widths: Vec<_> = scaling.rows().iter().map(|row| row.width().get()).collect();
        assert_eq!(widths, [1, 2, 4]);

        let baseline = scaling.baseline().unwrap();
        assert_eq!(baseline.width().get(), 1);

        for row in scaling.rows() {
            for strategy in Strategy::ALL {
                assert!(row.seconds(strategy).is_some());
            }
        }
    });
}
