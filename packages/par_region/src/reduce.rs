use std::ops::Range;

use crate::WorkerPool;

impl WorkerPool {
    /// Folds every index of `range` into a single value.
    ///
    /// Each worker starts a private accumulator from `identity` and folds the indexes of its
    /// static share into it with `fold`. After all workers have joined, the partial results are
    /// merged with `combine` in worker id order, starting again from `identity`. For the result
    /// to be independent of the worker count, `combine` must be associative and `identity`
    /// must be its neutral element.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::WorkerCreation`][crate::RegionError::WorkerCreation] if the
    /// region cannot be started.
    ///
    /// # Examples
    ///
    /// ```
    /// use new_zealand::nz;
    /// use par_region::WorkerPool;
    ///
    /// let values = [1.0, 2.0, 3.0, 4.0];
    ///
    /// let sum = WorkerPool::new(nz!(3))
    ///     .parallel_reduce(0..values.len(), 0.0, |acc, i| acc + values[i], |a, b| a + b)
    ///     .unwrap();
    ///
    /// assert_eq!(sum, 10.0);
    /// ```
    pub fn parallel_reduce<T, Fold, Combine>(
        &self,
        range: Range<usize>,
        identity: T,
        fold: Fold,
        combine: Combine,
    ) -> crate::Result<T>
    where
        T: Clone + Send + Sync,
        Fold: Fn(T, usize) -> T + Sync,
        Combine: Fn(T, T) -> T,
    {
        let offset = range.start;
        let len = range.len();

        let partials = self.run(|ctx| {
            ctx.static_share(len)
                .map(|index| offset.wrapping_add(index))
                .fold(identity.clone(), &fold)
        })?;

        Ok(partials.into_iter().fold(identity, combine))
    }
}
