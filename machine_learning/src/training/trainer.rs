use ndarray::{Array2, ArrayView2};

use crate::Result;

/// The loss and error a model showed on a single mini-batch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchStats {
    pub loss: f32,
    pub error: f32,
}

/// Something that can be fitted to mini-batches and queried afterwards.
///
/// Every method takes the batch as `(x, y)` arrays with one sample per row.
pub trait Trainable {
    /// Makes one update step of the model's parameters over the batch.
    ///
    /// # Returns
    /// The loss and error measured on the batch before the update.
    fn train_on_batch(&mut self, x: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<BatchStats>;

    /// Measures the error of the model over the batch without updating it.
    fn evaluate_on_batch(&mut self, x: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<f32>;

    /// Runs the model over `x`.
    fn infer(&mut self, x: ArrayView2<f32>) -> Result<Array2<f32>>;
}
