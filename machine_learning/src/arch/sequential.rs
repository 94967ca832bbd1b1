use std::mem;

use ndarray::{ArrayView2, ArrayViewMut2};
use rand::Rng;

use super::{Model, layers::Layer};
use crate::{
    MlErr, Result,
    initialization::{ConstWeightGen, RandWeightGen, WeightGen},
};

/// A sequential model: information flows forward when computing an output and backward when
/// computing the *deltas* of its layers.
#[derive(Clone, Debug)]
pub struct Sequential {
    layers: Vec<Layer>,
}

impl Sequential {
    /// Creates a new `Sequential`.
    ///
    /// # Arguments
    /// * `layers` - The layers the sequential is composed of.
    ///
    /// # Returns
    /// A new `Sequential` instance or an error if there are no layers or a layer's input
    /// doesn't match the previous layer's output.
    pub fn new<I>(layers: I) -> Result<Self>
    where
        I: IntoIterator<Item = Layer>,
    {
        let layers: Vec<_> = layers.into_iter().collect();

        if layers.is_empty() {
            return Err(MlErr::EmptyModel);
        }

        for pair in layers.windows(2) {
            let (_, out) = pair[0].fans();
            let (input, _) = pair[1].fans();

            if input != out {
                return Err(MlErr::SizeMismatch {
                    what: "layer input",
                    got: input,
                    expected: out,
                });
            }
        }

        Ok(Self { layers })
    }

    /// Generates a fresh parameter buffer: Glorot (Xavier) uniform weights and zero biases.
    ///
    /// # Arguments
    /// * `rng` - The random number generator to sample the weights with.
    ///
    /// # Returns
    /// A buffer of exactly `self.size()` parameters or an error if a layer has no fan.
    pub fn init_params<R: Rng>(&self, rng: &mut R) -> Result<Vec<f32>> {
        let mut params = Vec::with_capacity(self.size());

        for layer in &self.layers {
            let (fan_in, fan_out) = layer.fans();
            let w_size = fan_in * fan_out;

            let mut weights = RandWeightGen::xavier_uniform(w_size, fan_in, fan_out)?;
            let mut biases = ConstWeightGen::new(0., layer.size() - w_size);

            params.extend(weights.sample(rng, w_size).unwrap_or_default());
            params.extend(biases.sample(rng, fan_out).unwrap_or_default());
        }

        Ok(params)
    }

    fn check_size(&self, got: usize) -> Result<()> {
        let expected = self.size();

        if got != expected {
            return Err(MlErr::SizeMismatch {
                what: "model parameters",
                got,
                expected,
            });
        }

        Ok(())
    }
}

impl Model for Sequential {
    fn size(&self) -> usize {
        self.layers.iter().map(|layer| layer.size()).sum()
    }

    fn forward<'a>(
        &'a mut self,
        params: &[f32],
        mut x: ArrayView2<'a, f32>,
    ) -> Result<ArrayView2<'a, f32>> {
        self.check_size(params.len())?;
        let mut rest = params;

        for layer in self.layers.iter_mut() {
            let (head, tail) = rest.split_at(layer.size());
            rest = tail;
            x = layer.forward(head, x)?;
        }

        Ok(x)
    }

    fn backward(
        &mut self,
        params: &[f32],
        grad: &mut [f32],
        d: ArrayViewMut2<f32>,
    ) -> Result<()> {
        self.check_size(params.len())?;
        self.check_size(grad.len())?;

        let mut d = d;
        let mut params_rest = params;
        let mut grad_rest = grad;

        for layer in self.layers.iter_mut().rev() {
            let size = layer.size();

            let (params_head, params_tail) = params_rest.split_at(params_rest.len() - size);
            let grad_len = grad_rest.len();
            let (grad_head, grad_tail) = mem::take(&mut grad_rest).split_at_mut(grad_len - size);
            params_rest = params_head;
            grad_rest = grad_head;

            d = layer.backward(params_tail, grad_tail, d)?;
        }

        Ok(())
    }
}
