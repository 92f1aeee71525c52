use bench_support::{AllocationError, MATRIX_VALUE_LIMIT, RandomFill, try_zeroed_grid};

/// A square matrix of doubles stored in one contiguous row-major buffer.
///
/// All constructors are fallible so that a matrix too large for the machine is reported
/// instead of aborting the process.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    side: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// A `side` x `side` matrix of zeros.
    ///
    /// # Errors
    ///
    /// Fails if `side * side` overflows or the buffer cannot be allocated.
    pub fn zeroed(side: usize) -> Result<Self, AllocationError> {
        Ok(Self {
            side,
            data: try_zeroed_grid(side, side)?,
        })
    }

    /// A `side` x `side` matrix with every element equal to `value`.
    ///
    /// # Errors
    ///
    /// Fails if `side * side` overflows or the buffer cannot be allocated.
    pub fn filled(side: usize, value: f64) -> Result<Self, AllocationError> {
        let mut matrix = Self::zeroed(side)?;
        matrix.data.fill(value);
        Ok(matrix)
    }

    /// The `side` x `side` identity matrix.
    ///
    /// # Errors
    ///
    /// Fails if `side * side` overflows or the buffer cannot be allocated.
    pub fn identity(side: usize) -> Result<Self, AllocationError> {
        Self::from_fn(side, |row, column| if row == column { 1.0 } else { 0.0 })
    }

    /// A `side` x `side` matrix whose element `(row, column)` is `element(row, column)`.
    ///
    /// # Errors
    ///
    /// Fails if `side * side` overflows or the buffer cannot be allocated.
    pub fn from_fn(
        side: usize,
        mut element: impl FnMut(usize, usize) -> f64,
    ) -> Result<Self, AllocationError> {
        let mut matrix = Self::zeroed(side)?;

        for (row, values) in matrix.rows_mut().enumerate() {
            for (column, value) in values.iter_mut().enumerate() {
                *value = element(row, column);
            }
        }

        Ok(matrix)
    }

    /// Overwrites every element with a value drawn uniformly from `[0, 1)`.
    pub fn fill_random(&mut self, fill: &mut RandomFill) {
        fill.fill(&mut self.data, MATRIX_VALUE_LIMIT);
    }

    /// Number of rows, which is also the number of columns.
    #[must_use]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Element at `(row, column)`, or `None` if either is out of range.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.row(row)?.get(column).copied()
    }

    /// The elements of one row, or `None` if `row` is out of range.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        self.rows().nth(row)
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> {
        // A zero side has no rows, and chunks_exact rejects a zero chunk length.
        self.data.chunks_exact(self.side.max(1))
    }

    pub(crate) fn rows_mut(&mut self) -> impl ExactSizeIterator<Item = &mut [f64]> {
        self.data.chunks_exact_mut(self.side.max(1))
    }

    /// All elements in row-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use bench_support::DEFAULT_SEED;

    use super::*;

    #[test]
    fn identity_has_ones_on_diagonal() {
        let identity = Matrix::identity(3).unwrap();

        assert_eq!(
            identity.as_slice(),
            [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn from_fn_is_row_major() {
        let matrix = Matrix::from_fn(2, |row, column| (row * 10 + column) as f64).unwrap();

        assert_eq!(matrix.row(1), Some([10.0, 11.0].as_slice()));
        assert_eq!(matrix.get(0, 1), Some(1.0));
        assert_eq!(matrix.get(2, 0), None);
        assert_eq!(matrix.get(0, 2), None);
    }

    #[test]
    fn empty_matrix_has_no_rows() {
        let matrix = Matrix::zeroed(0).unwrap();

        assert_eq!(matrix.rows().len(), 0);
        assert!(matrix.as_slice().is_empty());
    }

    #[test]
    fn oversized_matrix_is_an_error() {
        assert!(matches!(
            Matrix::zeroed(usize::MAX),
            Err(AllocationError::TooLarge { .. })
        ));
    }

    #[test]
    fn random_fill_stays_below_one() {
        let mut matrix = Matrix::zeroed(16).unwrap();

        matrix.fill_random(&mut RandomFill::seeded(DEFAULT_SEED));

        assert!(matrix.as_slice().iter().all(|v| (0.0..1.0).contains(v)));
    }
}
