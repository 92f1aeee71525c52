use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Upper bound (exclusive) of the values used to fill reduction arrays.
pub const ARRAY_VALUE_LIMIT: f64 = 1000.0;

/// Upper bound (exclusive) of the values used to fill matrices.
pub const MATRIX_VALUE_LIMIT: f64 = 1.0;

/// Seed used by the benchmark programs, so that every run works on identical data.
pub const DEFAULT_SEED: u64 = 0x5eed_0f_a11_da7a;

/// Fills buffers with uniformly distributed doubles from an explicitly seeded generator.
///
/// Two instances created with the same seed produce the same sequence of values.
///
/// # Examples
///
/// ```
/// use bench_support::{ARRAY_VALUE_LIMIT, RandomFill};
///
/// let mut values = vec![0.0; 1000];
/// RandomFill::seeded(42).fill(&mut values, ARRAY_VALUE_LIMIT);
///
/// assert!(values.iter().all(|v| (0.0..ARRAY_VALUE_LIMIT).contains(v)));
/// ```
#[derive(Debug)]
pub struct RandomFill {
    rng: StdRng,
}

impl RandomFill {
    /// Creates a generator with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Overwrites every element of `buffer` with a value drawn uniformly from `[0, limit)`.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is not a positive finite number.
    pub fn fill(&mut self, buffer: &mut [f64], limit: f64) {
        assert!(
            limit.is_finite() && limit > 0.0,
            "fill limit must be positive and finite, got {limit}"
        );

        for value in buffer {
            *value = self.rng.random_range(0.0..limit);
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_values() {
        let mut first = vec![0.0; 64];
        let mut second = vec![0.0; 64];

        RandomFill::seeded(7).fill(&mut first, ARRAY_VALUE_LIMIT);
        RandomFill::seeded(7).fill(&mut second, ARRAY_VALUE_LIMIT);

        assert!(first.iter().zip(&second).all(|(a, b)| a.to_bits() == b.to_bits()));
    }

    #[test]
    fn different_seed_different_values() {
        let mut first = vec![0.0; 64];
        let mut second = vec![0.0; 64];

        RandomFill::seeded(1).fill(&mut first, MATRIX_VALUE_LIMIT);
        RandomFill::seeded(2).fill(&mut second, MATRIX_VALUE_LIMIT);

        assert!(first.iter().zip(&second).any(|(a, b)| a.to_bits() != b.to_bits()));
    }

    #[test]
    fn values_stay_in_range() {
        let mut values = vec![-1.0; 10_000];

        RandomFill::seeded(DEFAULT_SEED).fill(&mut values, MATRIX_VALUE_LIMIT);

        assert!(values.iter().all(|v| (0.0..MATRIX_VALUE_LIMIT).contains(v)));
    }

    #[test]
    #[should_panic(expected = "fill limit")]
    fn zero_limit_is_rejected() {
        RandomFill::seeded(0).fill(&mut [0.0; 4], 0.0);
    }
}
