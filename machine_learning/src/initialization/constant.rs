use rand::Rng;

use super::WeightGen;

/// A weight generator that always generates the same value.
pub struct ConstWeightGen {
    value: f32,
    remaining: usize,
}

impl ConstWeightGen {
    /// Creates a new `ConstWeightGen` weight generator.
    ///
    /// # Arguments
    /// * `value` - The value to always generate.
    /// * `limit` - The maximum amount of times to generate that value.
    ///
    /// # Returns
    /// A new `ConstWeightGen` instance.
    pub fn new(value: f32, limit: usize) -> Self {
        Self {
            value,
            remaining: limit,
        }
    }
}

impl WeightGen for ConstWeightGen {
    fn sample<R: Rng>(&mut self, _rng: &mut R, mut n: usize) -> Option<Vec<f32>> {
        if self.remaining == 0 {
            return None;
        }

        n = n.min(self.remaining);
        self.remaining -= n;
        Some(vec![self.value; n])
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn empty() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut weight_gen = ConstWeightGen::new(1., 0);
        assert!(weight_gen.sample(&mut rng, 1).is_none());
    }

    #[test]
    fn partial() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut weight_gen = ConstWeightGen::new(1., 10);

        let sample = weight_gen.sample(&mut rng, 7).unwrap();
        assert_eq!(sample, vec![1.; 7]);

        let sample = weight_gen.sample(&mut rng, 7).unwrap();
        assert_eq!(sample, vec![1.; 3]);
        assert!(weight_gen.sample(&mut rng, 1).is_none());
    }
}
