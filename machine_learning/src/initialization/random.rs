use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

use super::WeightGen;
use crate::{MlErr, Result};

/// A weight generator that follows a certain probabilistic distribution.
pub struct RandWeightGen<D: Distribution<f32>> {
    distribution: D,
    remaining: usize,
}

impl<D: Distribution<f32>> RandWeightGen<D> {
    /// Creates a new `RandWeightGen` weight generator.
    ///
    /// # Arguments
    /// * `distribution` - The distribution to sample the random numbers from.
    /// * `limit` - The maximum amount of numbers to generate.
    pub fn new(distribution: D, limit: usize) -> Self {
        Self {
            distribution,
            remaining: limit,
        }
    }
}

impl RandWeightGen<Uniform<f32>> {
    /// Creates a new `RandWeightGen` weight generator with a uniform distribution.
    ///
    /// # Arguments
    /// * `limit` - The maximum amount of numbers to generate.
    /// * `low` - The inclusive lower limit.
    /// * `high` - The exclusive upper limit.
    ///
    /// # Returns
    /// An error if the range is invalid (low >= high or not finite).
    pub fn uniform(limit: usize, low: f32, high: f32) -> Result<Self> {
        let distribution =
            Uniform::new(low, high).map_err(|e| MlErr::InvalidInit(e.to_string()))?;
        Ok(Self::new(distribution, limit))
    }

    /// Creates a new `RandWeightGen` weight generator using Xavier (Glorot) uniform
    /// initialization.
    ///
    /// # Arguments
    /// * `limit` - The maximum amount of numbers to generate.
    /// * `fan_in` - The number of input units in the weight tensor.
    /// * `fan_out` - The number of output units in the weight tensor.
    ///
    /// # Returns
    /// An error if the calculated range is invalid.
    pub fn xavier_uniform(limit: usize, fan_in: usize, fan_out: usize) -> Result<Self> {
        let range = (6. / (fan_in + fan_out) as f32).sqrt();
        Self::uniform(limit, -range, range)
    }
}

impl RandWeightGen<Normal<f32>> {
    /// Creates a new `RandWeightGen` weight generator with a normal distribution.
    ///
    /// # Arguments
    /// * `limit` - The maximum amount of numbers to generate.
    /// * `mean` - The mean of the distribution.
    /// * `std_dev` - The standard deviation of the distribution.
    ///
    /// # Returns
    /// An error if `std_dev` is not finite (Nan or infinite).
    pub fn normal(limit: usize, mean: f32, std_dev: f32) -> Result<Self> {
        let distribution =
            Normal::new(mean, std_dev).map_err(|e| MlErr::InvalidInit(e.to_string()))?;
        Ok(Self::new(distribution, limit))
    }

    /// Creates a new `RandWeightGen` weight generator using Kaiming normal initialization.
    ///
    /// # Arguments
    /// * `limit` - The maximum amount of numbers to generate.
    /// * `fan_in` - The number of input units in the weight tensor.
    pub fn kaiming(limit: usize, fan_in: usize) -> Result<Self> {
        let std_dev = (2. / fan_in as f32).sqrt();
        Self::normal(limit, 0., std_dev)
    }
}

impl<D: Distribution<f32>> WeightGen for RandWeightGen<D> {
    fn sample<R: Rng>(&mut self, rng: &mut R, mut n: usize) -> Option<Vec<f32>> {
        if self.remaining == 0 {
            return None;
        }

        n = n.min(self.remaining);
        self.remaining -= n;

        let sample = (0..n).map(|_| self.distribution.sample(rng)).collect();
        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn exact() {
        const SIZE: usize = 10;
        let mut rng = StdRng::seed_from_u64(42);

        let mut weight_gen = RandWeightGen::uniform(SIZE, -1., 1.).unwrap();
        let sample = weight_gen.sample(&mut rng, SIZE).unwrap();

        assert_eq!(sample.len(), SIZE);
        assert!(sample.iter().all(|w| (-1.0..1.0).contains(w)));
        assert!(weight_gen.sample(&mut rng, 1).is_none());
    }

    #[test]
    fn partial() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut weight_gen = RandWeightGen::normal(10, 0., 1.).unwrap();

        assert_eq!(weight_gen.sample(&mut rng, 7).unwrap().len(), 7);
        assert_eq!(weight_gen.sample(&mut rng, 7).unwrap().len(), 3);
        assert!(weight_gen.sample(&mut rng, 1).is_none());
    }

    #[test]
    fn xavier_uniform_stays_within_its_bound() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut weight_gen = RandWeightGen::xavier_uniform(784 * 64, 784, 64).unwrap();
        let bound = (6. / 848_f32).sqrt();

        let sample = weight_gen.sample(&mut rng, 784 * 64).unwrap();
        assert!(sample.iter().all(|w| w.abs() <= bound));
    }

    #[test]
    fn invalid_range_is_an_error() {
        assert!(RandWeightGen::uniform(1, 1., -1.).is_err());
    }
}
