//! Integration tests for parallel regions with real worker threads.
//!
//! These tests are ignored under Miri because they start many threads and Miri is too slow
//! for that to be practical.

use std::collections::BTreeSet;
use std::num::NonZero;
use std::sync::atomic::Ordering;

use new_zealand::nz;
use par_region::{AtomicF64, Monitor, RegionLock, WorkerPool, current_id, current_width};
use testing::with_watchdog;

const WIDTHS: [NonZero<usize>; 5] = [nz!(1), nz!(2), nz!(4), nz!(8), nz!(16)];

#[cfg_attr(miri, ignore)]
#[test]
fn observed_ids_are_exactly_zero_to_width() {
    with_watchdog(|| {
        for width in WIDTHS {
            let ids = Monitor::new(Vec::new());

            WorkerPool::new(width)
                .run(|ctx| {
                    assert_eq!(ctx.width(), width);
                    ids.enter(|ids| ids.push(ctx.id()));
                })
                .unwrap();

            let ids = ids.into_inner();
            let unique: BTreeSet<_> = ids.iter().copied().collect();

            assert_eq!(ids.len(), width.get());
            assert_eq!(unique, (0..width.get()).collect());
        }
    });
}

#[cfg_attr(miri, ignore)]
#[test]
fn monitor_serializes_increments() {
    const INCREMENTS: u64 = 5_000;

    with_watchdog(|| {
        for width in WIDTHS {
            let counter = Monitor::new(0_u64);

            WorkerPool::new(width)
                .run(|_| {
                    for _ in 0..INCREMENTS {
                        counter.enter(|value| {
                            // Separate read and write lose updates unless the section is serialized.
                            let current = *value;
                            *value = current + 1;
                        });
                    }
                })
                .unwrap();

            assert_eq!(counter.into_inner(), INCREMENTS * width.get() as u64);
        }
    });
}

#[cfg_attr(miri, ignore)]
#[test]
fn named_lock_serializes_read_modify_write() {
    const INCREMENTS: u64 = 5_000;

    with_watchdog(|| {
        let lock = RegionLock::new("counter", 0_u64);

        WorkerPool::new(nz!(8))
            .run(|_| {
                for _ in 0..INCREMENTS {
                    let mut guard = lock.acquire();
                    let current = *guard;
                    *guard = current + 1;
                    guard.release();
                }
            })
            .unwrap();

        assert_eq!(lock.into_inner(), INCREMENTS * 8);
    });
}

#[cfg_attr(miri, ignore)]
#[test]
fn atomic_adds_from_all_workers_are_kept() {
    with_watchdog(|| {
        let total = AtomicF64::new(0.0);

        WorkerPool::new(nz!(8))
            .run(|_| {
                for _ in 0..10_000 {
                    total.fetch_add(0.5, Ordering::Relaxed);
                }
            })
            .unwrap();

        assert_eq!(total.into_inner().to_bits(), 40_000.0_f64.to_bits());
    });
}

#[cfg_attr(miri, ignore)]
#[test]
fn reduce_matches_sequential_for_every_width() {
    with_watchdog(|| {
        let values: Vec<u64> = (0..10_007).collect();
        let expected: u64 = values.iter().sum();

        for width in WIDTHS {
            let sum = WorkerPool::new(width)
                .parallel_reduce(0..values.len(), 0, |acc, i| acc + values[i], |a, b| a + b)
                .unwrap();

            assert_eq!(sum, expected, "width {width}");
        }
    });
}

#[cfg_attr(miri, ignore)]
#[test]
fn position_queries_reset_after_region() {
    with_watchdog(|| {
        let inside = WorkerPool::new(nz!(4))
            .run(|_| (current_id(), current_width().get()))
            .unwrap();

        assert_eq!(&*inside, &[(0, 4), (1, 4), (2, 4), (3, 4)]);
        assert_eq!(current_id(), 0);
        assert_eq!(current_width(), nz!(1));
    });
}
