use std::mem;
use std::num::NonZero;
use std::ops::Range;
use std::slice::ChunksMut;

use par_region::{RegionContext, RegionError, WorkerPool};
use parking_lot::Mutex;
use tracing::trace;

use crate::{Matrix, Schedule};

/// Which rows of the result each worker computed, in the order it computed them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TileReport {
    rows_by_worker: Box<[Vec<Range<usize>>]>,
}

impl TileReport {
    fn single_worker(side: usize) -> Self {
        let rows = if side == 0 { Vec::new() } else { vec![0..side] };

        Self {
            rows_by_worker: Box::new([rows]),
        }
    }

    /// Number of workers that took part.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.rows_by_worker.len()
    }

    /// Row ranges computed by `worker_id`, one per tile. Empty for an unknown worker.
    #[must_use]
    pub fn rows_of(&self, worker_id: usize) -> &[Range<usize>] {
        self.rows_by_worker
            .get(worker_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Row ranges of all workers, indexed by worker id.
    pub fn workers(&self) -> impl Iterator<Item = &[Range<usize>]> {
        self.rows_by_worker.iter().map(Vec::as_slice)
    }

    /// How many times each row of a `side` x `side` result was computed.
    ///
    /// For a correct schedule every entry is 1.
    #[must_use]
    pub fn visits_per_row(&self, side: usize) -> Vec<usize> {
        let mut visits = vec![0_usize; side];

        for range in self.rows_by_worker.iter().flatten() {
            for row in range.clone() {
                if let Some(count) = visits.get_mut(row) {
                    *count = count.saturating_add(1);
                }
            }
        }

        visits
    }
}

/// Computes `c = a · b` on the calling thread, one row at a time.
///
/// Each element is accumulated from zero over `k` in increasing order.
///
/// # Panics
///
/// Panics if the three matrices do not have the same side.
pub fn multiply_sequential(a: &Matrix, b: &Matrix, c: &mut Matrix) {
    assert_same_side(a.side(), b.side(), c.side());

    multiply_rows(a, b, 0, c.as_mut_slice());
}

/// Computes `c = a · b` on the workers of `pool`, one tile of `chunk` rows at a time.
///
/// With a single worker this calls [`multiply_sequential`] without starting a region. A
/// `chunk` larger than the side makes the whole result one tile.
///
/// This is [`TilePlan::new`] followed by [`TilePlan::execute`].
///
/// # Errors
///
/// Fails if the parallel region cannot be started. `c` is then partially computed.
///
/// # Panics
///
/// Panics if the three matrices do not have the same side.
pub fn multiply_tiled(
    pool: &WorkerPool,
    a: &Matrix,
    b: &Matrix,
    c: &mut Matrix,
    chunk: NonZero<usize>,
    schedule: Schedule,
) -> Result<TileReport, RegionError> {
    assert_same_side(a.side(), b.side(), c.side());

    TilePlan::new(c, pool.width(), chunk, schedule).execute(pool, a, b)
}

/// The tiles of a result matrix, split and assigned to workers ahead of the multiplication.
///
/// Building the plan does all the bookkeeping allocation, so timing only
/// [`execute()`][Self::execute] measures the region and nothing else.
///
/// # Examples
///
/// ```
/// use new_zealand::nz;
/// use par_region::WorkerPool;
/// use tiled_matmul::{Matrix, Schedule, TilePlan};
///
/// let pool = WorkerPool::new(nz!(2));
/// let a = Matrix::identity(4).unwrap();
/// let b = Matrix::filled(4, 3.0).unwrap();
/// let mut c = Matrix::zeroed(4).unwrap();
///
/// let plan = TilePlan::new(&mut c, pool.width(), nz!(1), Schedule::Static);
/// let report = plan.execute(&pool, &a, &b).unwrap();
///
/// assert_eq!(report.rows_of(1), [1..2, 3..4]);
/// assert_eq!(c, b);
/// ```
#[derive(Debug)]
pub struct TilePlan<'c> {
    side: usize,
    width: NonZero<usize>,
    work: PlannedWork<'c>,
}

#[derive(Debug)]
enum PlannedWork<'c> {
    Sequential(&'c mut [f64]),

    // Each worker takes its own list exactly once, so these locks are never contended.
    Static(Box<[Mutex<Vec<Tile<'c>>>]>),

    Dynamic(Mutex<TileCursor<'c>>),
}

impl<'c> TilePlan<'c> {
    /// Splits `c` into tiles of `chunk` rows and assigns them for a region of `width` workers.
    #[must_use]
    pub fn new(
        c: &'c mut Matrix,
        width: NonZero<usize>,
        chunk: NonZero<usize>,
        schedule: Schedule,
    ) -> Self {
        let side = c.side();

        if width.get() == 1 || side == 0 {
            return Self {
                side,
                width,
                work: PlannedWork::Sequential(c.as_mut_slice()),
            };
        }

        let cursor = TileCursor {
            next_row: 0,
            chunk: chunk.get(),
            tiles: c.as_mut_slice().chunks_mut(chunk.get().saturating_mul(side)),
        };

        let work = match schedule {
            Schedule::Static => PlannedWork::Static(assign_round_robin(cursor, width.get())),
            Schedule::Dynamic => PlannedWork::Dynamic(Mutex::new(cursor)),
        };

        Self { side, width, work }
    }

    /// Computes every planned tile of `a · b` on the workers of `pool`.
    ///
    /// # Errors
    ///
    /// Fails if the parallel region cannot be started. The result is then partially computed.
    ///
    /// # Panics
    ///
    /// Panics if `a` or `b` has a different side than the planned result, or if `pool` has a
    /// different width than the plan was made for.
    pub fn execute(
        self,
        pool: &WorkerPool,
        a: &Matrix,
        b: &Matrix,
    ) -> Result<TileReport, RegionError> {
        assert_same_side(a.side(), b.side(), self.side);
        assert_eq!(
            pool.width(),
            self.width,
            "pool width differs from the width the tiles were planned for"
        );

        let rows_by_worker = match self.work {
            PlannedWork::Sequential(values) => {
                multiply_rows(a, b, 0, values);
                return Ok(TileReport::single_worker(self.side));
            }
            PlannedWork::Static(assignments) => run_static(pool, a, b, &assignments)?,
            PlannedWork::Dynamic(cursor) => run_dynamic(pool, a, b, &cursor)?,
        };

        Ok(TileReport { rows_by_worker })
    }
}

/// A tile of consecutive rows of the result, with the index of its first row.
#[derive(Debug)]
struct Tile<'c> {
    first_row: usize,
    values: &'c mut [f64],
}

impl Tile<'_> {
    fn compute(self, a: &Matrix, b: &Matrix, ctx: &RegionContext) -> Range<usize> {
        let row_count = self.values.len().checked_div(b.side()).unwrap_or_default();
        let rows = self.first_row..self.first_row.saturating_add(row_count);

        trace!(worker = ctx.id(), ?rows, "computing tile");

        multiply_rows(a, b, self.first_row, self.values);
        rows
    }
}

/// Numbers tiles with their first row as they are handed out.
#[derive(Debug)]
struct TileCursor<'c> {
    next_row: usize,
    chunk: usize,
    tiles: ChunksMut<'c, f64>,
}

impl<'c> Iterator for TileCursor<'c> {
    type Item = Tile<'c>;

    fn next(&mut self) -> Option<Self::Item> {
        let values = self.tiles.next()?;
        let first_row = self.next_row;
        self.next_row = self.next_row.saturating_add(self.chunk);

        Some(Tile { first_row, values })
    }
}

/// Tile `t` goes to worker `t mod width`.
fn assign_round_robin(cursor: TileCursor<'_>, width: usize) -> Box<[Mutex<Vec<Tile<'_>>>]> {
    let mut assignments: Vec<Vec<Tile<'_>>> = (0..width).map(|_| Vec::new()).collect();

    for (tile, worker) in cursor.zip((0..width).cycle()) {
        if let Some(owned) = assignments.get_mut(worker) {
            owned.push(tile);
        }
    }

    assignments.into_iter().map(Mutex::new).collect()
}

fn run_static(
    pool: &WorkerPool,
    a: &Matrix,
    b: &Matrix,
    assignments: &[Mutex<Vec<Tile<'_>>>],
) -> Result<Box<[Vec<Range<usize>>]>, RegionError> {
    pool.run(|ctx| {
        let owned = assignments
            .get(ctx.id())
            .map(|owned| mem::take(&mut *owned.lock()))
            .unwrap_or_default();

        owned
            .into_iter()
            .map(|tile| tile.compute(a, b, ctx))
            .collect()
    })
}

fn run_dynamic(
    pool: &WorkerPool,
    a: &Matrix,
    b: &Matrix,
    cursor: &Mutex<TileCursor<'_>>,
) -> Result<Box<[Vec<Range<usize>>]>, RegionError> {
    pool.run(|ctx| {
        let mut computed = Vec::new();

        loop {
            // The guard is dropped before the tile is computed.
            let Some(tile) = cursor.lock().next() else {
                break;
            };

            computed.push(tile.compute(a, b, ctx));
        }

        computed
    })
}

/// Computes the rows of `a · b` starting at `first_row` into `out`, which holds whole rows.
#[expect(
    clippy::indexing_slicing,
    reason = "column indexes come from enumerating a row of the same side"
)]
fn multiply_rows(a: &Matrix, b: &Matrix, first_row: usize, out: &mut [f64]) {
    let side = b.side().max(1);

    for (c_row, a_row) in out.chunks_exact_mut(side).zip(a.rows().skip(first_row)) {
        c_row.fill(0.0);

        for (column, cell) in c_row.iter_mut().enumerate() {
            for (a_value, b_row) in a_row.iter().zip(b.rows()) {
                *cell += a_value * b_row[column];
            }
        }
    }
}

fn assert_same_side(a: usize, b: usize, c: usize) {
    assert!(
        a == b && b == c,
        "matrix sides differ: a is {a}, b is {b}, c is {c}"
    );
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use new_zealand::nz;

    use super::*;

    fn counting(side: usize) -> Matrix {
        Matrix::from_fn(side, |row, column| (row * side + column) as f64).unwrap()
    }

    #[test]
    fn sequential_two_by_two() {
        let a = Matrix::from_fn(2, |row, column| [[1.0, 2.0], [3.0, 4.0]][row][column]).unwrap();
        let b = Matrix::from_fn(2, |row, column| [[5.0, 6.0], [7.0, 8.0]][row][column]).unwrap();
        let mut c = Matrix::filled(2, f64::NAN).unwrap();

        multiply_sequential(&a, &b, &mut c);

        assert_eq!(c.as_slice(), [19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    #[should_panic(expected = "matrix sides differ")]
    fn mismatched_sides_are_rejected() {
        let a = Matrix::zeroed(2).unwrap();
        let b = Matrix::zeroed(3).unwrap();
        let mut c = Matrix::zeroed(2).unwrap();

        multiply_sequential(&a, &b, &mut c);
    }

    #[test]
    fn single_worker_bypasses_region() {
        let a = counting(5);
        let b = counting(5);
        let mut c = Matrix::zeroed(5).unwrap();

        let report =
            multiply_tiled(&WorkerPool::new(nz!(1)), &a, &b, &mut c, nz!(2), Schedule::Static)
                .unwrap();

        assert_eq!(report.worker_count(), 1);
        assert_eq!(report.rows_of(0), [0..5]);
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn static_tiles_are_round_robin() {
        let a = counting(10);
        let b = counting(10);
        let mut c = Matrix::zeroed(10).unwrap();

        let report =
            multiply_tiled(&WorkerPool::new(nz!(2)), &a, &b, &mut c, nz!(3), Schedule::Static)
                .unwrap();

        assert_eq!(report.rows_of(0), [0..3, 6..9]);
        assert_eq!(report.rows_of(1), [3..6, 9..10]);
        assert!(report.rows_of(2).is_empty());
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn chunk_larger_than_side_is_one_tile() {
        let a = counting(4);
        let b = counting(4);
        let mut c = Matrix::zeroed(4).unwrap();

        for schedule in [Schedule::Static, Schedule::Dynamic] {
            let report =
                multiply_tiled(&WorkerPool::new(nz!(3)), &a, &b, &mut c, nz!(100), schedule)
                    .unwrap();

            let tiles: Vec<_> = report.workers().flatten().cloned().collect();
            assert_eq!(tiles, [0..4]);
        }
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn planned_tiles_match_sequential_result() {
        let a = counting(9);
        let b = counting(9);
        let pool = WorkerPool::new(nz!(3));

        let mut expected = Matrix::zeroed(9).unwrap();
        multiply_sequential(&a, &b, &mut expected);

        for schedule in [Schedule::Static, Schedule::Dynamic] {
            let mut c = Matrix::filled(9, f64::NAN).unwrap();

            let plan = TilePlan::new(&mut c, pool.width(), nz!(2), schedule);
            let report = plan.execute(&pool, &a, &b).unwrap();

            assert_eq!(c, expected);
            assert_eq!(report.visits_per_row(9), [1; 9]);
        }
    }

    #[test]
    fn static_plan_assigns_tiles_before_execution() {
        let mut c = Matrix::zeroed(10).unwrap();

        let plan = TilePlan::new(&mut c, nz!(2), nz!(3), Schedule::Static);

        let PlannedWork::Static(assignments) = &plan.work else {
            panic!("static schedule must assign tiles up front");
        };

        let first_rows: Vec<Vec<usize>> = assignments
            .iter()
            .map(|owned| owned.lock().iter().map(|tile| tile.first_row).collect())
            .collect();

        assert_eq!(first_rows, [vec![0, 6], vec![3, 9]]);
    }

    #[test]
    #[should_panic(expected = "pool width differs")]
    fn plan_rejects_pool_of_other_width() {
        let a = counting(4);
        let b = counting(4);
        let mut c = Matrix::zeroed(4).unwrap();

        let plan = TilePlan::new(&mut c, nz!(2), nz!(1), Schedule::Static);
        drop(plan.execute(&WorkerPool::new(nz!(3)), &a, &b));
    }

    #[test]
    fn visits_count_overlaps() {
        let report = TileReport {
            rows_by_worker: Box::new([vec![0..2], vec![1..3]]),
        };

        assert_eq!(report.visits_per_row(4), [1, 2, 1, 0]);
    }
}
