//! Tiled multiplication against the sequential multiplication, across schedules, chunk sizes
//! and worker counts.

use std::num::NonZero;

use bench_support::{DEFAULT_SEED, RandomFill};
use new_zealand::nz;
use par_region::WorkerPool;
use testing::{assert_all_close, with_watchdog};
use tiled_matmul::{Matrix, Schedule, multiply_sequential, multiply_tiled};

const SCHEDULES: [Schedule; 2] = [Schedule::Static, Schedule::Dynamic];

fn random(side: usize, seed: u64) -> Matrix {
    let mut matrix = Matrix::zeroed(side).unwrap();
    matrix.fill_random(&mut RandomFill::seeded(seed));
    matrix
}

#[cfg_attr(miri, ignore)]
#[test]
fn identity_times_b_is_b() {
    with_watchdog(|| {
        let a = Matrix::identity(4).unwrap();
        let b = random(4, DEFAULT_SEED);

        for schedule in SCHEDULES {
            let mut c = Matrix::zeroed(4).unwrap();

            multiply_tiled(&WorkerPool::new(nz!(2)), &a, &b, &mut c, nz!(1), schedule).unwrap();

            assert_eq!(c, b, "{schedule}");
        }
    });
}

#[cfg_attr(miri, ignore)]
#[test]
fn ones_times_ones_dynamic() {
    with_watchdog(|| {
        let ones = Matrix::filled(8, 1.0).unwrap();
        let mut c = Matrix::zeroed(8).unwrap();

        multiply_tiled(
            &WorkerPool::new(nz!(3)),
            &ones,
            &ones,
            &mut c,
            nz!(3),
            Schedule::Dynamic,
        )
        .unwrap();

        assert_all_close(c.as_slice(), &[8.0; 64], 0.0);
    });
}

#[cfg_attr(miri, ignore)]
#[test]
fn dynamic_tail_tile_is_computed_once() {
    with_watchdog(|| {
        let a = random(129, 1);
        let b = random(129, 2);
        let mut c = Matrix::zeroed(129).unwrap();

        let report = multiply_tiled(
            &WorkerPool::new(nz!(4)),
            &a,
            &b,
            &mut c,
            nz!(16),
            Schedule::Dynamic,
        )
        .unwrap();

        assert_eq!(report.worker_count(), 4);

        let tail_owners = report
            .workers()
            .filter(|rows| rows.contains(&(128..129)))
            .count();
        assert_eq!(tail_owners, 1);

        let tiles: usize = report.workers().map(<[_]>::len).sum();
        assert_eq!(tiles, 9);

        assert!(report.visits_per_row(129).iter().all(|&visits| visits == 1));
    });
}

#[cfg_attr(miri, ignore)]
#[test]
fn tiled_matches_sequential() {
    with_watchdog(|| {
        for side in [1, 2, 17, 64, 100] {
            let a = random(side, 3);
            let b = random(side, 4);

            let mut expected = Matrix::zeroed(side).unwrap();
            multiply_sequential(&a, &b, &mut expected);

            for width in [nz!(1), nz!(2), nz!(3), nz!(8)] {
                for chunk in [nz!(1), nz!(7), nz!(16), nz!(1000)] {
                    for schedule in SCHEDULES {
                        let mut c = Matrix::filled(side, f64::NAN).unwrap();

                        let report =
                            multiply_tiled(&WorkerPool::new(width), &a, &b, &mut c, chunk, schedule)
                                .unwrap();

                        assert_all_close(c.as_slice(), expected.as_slice(), 1e-9);
                        assert!(report.visits_per_row(side).iter().all(|&visits| visits == 1));
                    }
                }
            }
        }
    });
}

#[cfg_attr(miri, ignore)]
#[test]
fn schedules_agree_on_a_large_matrix() {
    with_watchdog(|| {
        let side = 256;
        let a = random(side, 5);
        let b = random(side, 6);

        let multiply = |width: NonZero<usize>, chunk: NonZero<usize>, schedule: Schedule| {
            let mut c = Matrix::zeroed(side).unwrap();
            multiply_tiled(&WorkerPool::new(width), &a, &b, &mut c, chunk, schedule).unwrap();
            c
        };

        let baseline = multiply(nz!(1), nz!(16), Schedule::Static);

        for (width, chunk, schedule) in [
            (nz!(4), nz!(1), Schedule::Static),
            (nz!(4), nz!(64), Schedule::Dynamic),
            (nz!(7), nz!(13), Schedule::Dynamic),
            (nz!(16), nz!(300), Schedule::Static),
        ] {
            let c = multiply(width, chunk, schedule);

            assert_all_close(c.as_slice(), baseline.as_slice(), 1e-9);
        }
    });
}
