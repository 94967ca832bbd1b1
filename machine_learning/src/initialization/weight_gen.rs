use rand::Rng;

/// A `WeightGen` generates values for the initial state of the model's parameters.
pub trait WeightGen {
    /// Should sample at most `n` parameters.
    ///
    /// # Arguments
    /// * `rng` - The random number generator, ignored by deterministic generators.
    /// * `n` - The upper limit of samples to generate.
    ///
    /// # Returns
    /// An option whether the generator is exhausted.
    fn sample<R: Rng>(&mut self, rng: &mut R, n: usize) -> Option<Vec<f32>>;
}
