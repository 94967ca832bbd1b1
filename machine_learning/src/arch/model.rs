use ndarray::{ArrayView2, ArrayViewMut2};

use crate::Result;

/// A differentiable model over a flat parameter buffer it doesn't own.
pub trait Model {
    /// Returns the amount of parameters in the model.
    fn size(&self) -> usize;

    /// Makes a forward pass through the model.
    ///
    /// # Arguments
    /// * `params` - The model's flat parameter buffer.
    /// * `x` - The input data, one sample per row.
    ///
    /// # Returns
    /// The prediction for the given input or an error if occurred.
    fn forward<'a>(
        &'a mut self,
        params: &[f32],
        x: ArrayView2<'a, f32>,
    ) -> Result<ArrayView2<'a, f32>>;

    /// Propagates the derivative of the loss with respect to the output back through the model,
    /// overwriting `grad` with the gradient of every parameter.
    ///
    /// Must be called after a `forward` pass over the same batch.
    ///
    /// # Arguments
    /// * `params` - The model's flat parameter buffer.
    /// * `grad` - The model's flat gradient buffer.
    /// * `d` - The derivative of the loss with respect to the model's output.
    fn backward(&mut self, params: &[f32], grad: &mut [f32], d: ArrayViewMut2<f32>)
    -> Result<()>;
}
