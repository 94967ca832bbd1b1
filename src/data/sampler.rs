use log::trace;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::index};

use super::{Batch, Dataset};
use crate::{Result, SessionErr};

/// Draws uniformly random mini-batches from a fixed dataset.
///
/// Rows never repeat inside a batch but may repeat across batches: every call is independent,
/// there's no notion of epoch or coverage.
#[derive(Debug)]
pub struct BatchSampler<R: Rng = StdRng> {
    dataset: Dataset,
    len: usize,
    rng: R,
}

impl BatchSampler<StdRng> {
    /// Creates a new `BatchSampler` with its own `StdRng`.
    ///
    /// # Arguments
    /// * `dataset` - The samples to draw batches from.
    /// * `seed` - A seed for reproducible draws, `None` to seed from the OS.
    pub fn from_seed(dataset: Dataset, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self::new(dataset, rng)
    }
}

impl<R: Rng> BatchSampler<R> {
    /// Creates a new `BatchSampler`.
    ///
    /// # Arguments
    /// * `dataset` - The samples to draw batches from.
    /// * `rng` - The source of randomness for the row indices.
    pub fn new(dataset: Dataset, rng: R) -> Self {
        Self {
            len: dataset.len(),
            dataset,
            rng,
        }
    }

    /// Draws `batch_size` distinct rows uniformly at random.
    ///
    /// # Returns
    /// The freshly materialized batch or `SessionErr::InvalidBatchSize` unless
    /// `0 < batch_size <= len`.
    pub fn next_batch(&mut self, batch_size: usize) -> Result<Batch> {
        if batch_size == 0 || batch_size > self.len {
            return Err(SessionErr::InvalidBatchSize {
                requested: batch_size,
                available: self.len,
            });
        }

        let indices = index::sample(&mut self.rng, self.len, batch_size).into_vec();
        trace!("sampled {batch_size} of {} rows", self.len);

        Ok(self.dataset.select(&indices))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use ndarray::Array2;

    use super::*;

    /// Row `i` holds `[i, 10 * i]` and label `[i]`, so every row can be traced back.
    fn indexed(n: usize) -> Dataset {
        let features = Array2::from_shape_fn((n, 2), |(i, j)| (i * 10usize.pow(j as u32)) as f32);
        let labels = Array2::from_shape_fn((n, 1), |(i, _)| i as f32);
        Dataset::new(features, labels).unwrap()
    }

    #[test]
    fn batches_hold_distinct_rows_of_the_dataset() {
        let mut sampler = BatchSampler::from_seed(indexed(100), Some(1));

        for batch_size in [1, 10, 64, 100] {
            let batch = sampler.next_batch(batch_size).unwrap();
            assert_eq!(batch.len(), batch_size);

            let mut seen = HashSet::new();
            for (x, y) in batch.features.rows().into_iter().zip(batch.labels.rows()) {
                let i = y[0] as usize;
                assert!(i < 100);
                assert_eq!(x[0], i as f32);
                assert_eq!(x[1], (10 * i) as f32);
                assert!(seen.insert(i), "row {i} drawn twice");
            }
        }
    }

    #[test]
    fn full_batch_is_a_permutation() {
        let mut sampler = BatchSampler::from_seed(indexed(20), Some(2));
        let batch = sampler.next_batch(20).unwrap();

        let mut rows: Vec<_> = batch.labels.iter().map(|&y| y as usize).collect();
        rows.sort_unstable();
        assert_eq!(rows, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn out_of_range_batch_sizes_are_rejected() {
        let mut sampler = BatchSampler::from_seed(indexed(5), Some(3));

        for batch_size in [0, 6] {
            let err = sampler.next_batch(batch_size).unwrap_err();
            assert!(matches!(
                err,
                SessionErr::InvalidBatchSize {
                    requested,
                    available: 5
                } if requested == batch_size
            ));
        }
    }

    #[test]
    fn calls_are_independent_draws() {
        let mut sampler = BatchSampler::from_seed(indexed(1000), Some(4));

        let a = sampler.next_batch(10).unwrap();
        let b = sampler.next_batch(10).unwrap();

        assert_ne!(a.labels, b.labels);
        assert_eq!(sampler.len(), 1000);
    }

    #[test]
    fn same_seed_draws_same_batches() {
        let mut a = BatchSampler::from_seed(indexed(50), Some(9));
        let mut b = BatchSampler::from_seed(indexed(50), Some(9));

        assert_eq!(a.next_batch(8).unwrap(), b.next_batch(8).unwrap());
    }
}
