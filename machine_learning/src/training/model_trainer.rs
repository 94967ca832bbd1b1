use ndarray::{Array2, ArrayView2};

use super::{BatchStats, Trainable};
use crate::{
    MlErr, Result,
    arch::{Model, loss::LossFn, metrics::ClassificationError},
    optimization::Optimizer,
};

/// A model `Trainable`. Contains the relevant components needed for training a model,
/// including the model itself and the parameter buffer it's evaluated with.
pub struct ModelTrainer<M, O, L>
where
    M: Model,
    O: Optimizer,
    L: LossFn,
{
    model: M,
    params: Vec<f32>,
    grad: Vec<f32>,
    optimizer: O,
    loss_fn: L,
    metric: ClassificationError,
}

impl<M, O, L> ModelTrainer<M, O, L>
where
    M: Model,
    O: Optimizer,
    L: LossFn,
{
    /// Returns a new `ModelTrainer`.
    ///
    /// # Arguments
    /// * `model` - The model that will be trained.
    /// * `params` - The initial parameters of the model.
    /// * `optimizer` - The optimizer used for updating the parameters.
    /// * `loss_fn` - The loss function used to measure the difference between a model's output and the expected one.
    ///
    /// # Returns
    /// A new `ModelTrainer` or an error if `params` doesn't fit the model.
    pub fn new(model: M, params: Vec<f32>, optimizer: O, loss_fn: L) -> Result<Self> {
        let size = model.size();

        if params.len() != size {
            return Err(MlErr::SizeMismatch {
                what: "initial parameters",
                got: params.len(),
                expected: size,
            });
        }

        Ok(Self {
            model,
            params,
            grad: vec![0.; size],
            optimizer,
            loss_fn,
            metric: ClassificationError::new(),
        })
    }

    /// The current parameters of the model.
    pub fn params(&self) -> &[f32] {
        &self.params
    }
}

fn check_target(y_pred: &ArrayView2<f32>, y: &ArrayView2<f32>) -> Result<()> {
    if y_pred.dim() != y.dim() {
        return Err(MlErr::SizeMismatch {
            what: "batch targets",
            got: y.len(),
            expected: y_pred.len(),
        });
    }

    Ok(())
}

impl<M, O, L> Trainable for ModelTrainer<M, O, L>
where
    M: Model,
    O: Optimizer,
    L: LossFn,
{
    fn train_on_batch(&mut self, x: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<BatchStats> {
        let (stats, mut d) = {
            let y_pred = self.model.forward(&self.params, x)?;
            check_target(&y_pred, &y)?;

            let stats = BatchStats {
                loss: self.loss_fn.loss(y_pred, y),
                error: self.metric.error(y_pred, y),
            };

            (stats, self.loss_fn.loss_prime(y_pred, y))
        };

        self.model
            .backward(&self.params, &mut self.grad, d.view_mut())?;
        self.optimizer.update_params(&self.grad, &mut self.params)?;

        Ok(stats)
    }

    fn evaluate_on_batch(&mut self, x: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<f32> {
        let y_pred = self.model.forward(&self.params, x)?;
        check_target(&y_pred, &y)?;
        Ok(self.metric.error(y_pred, y))
    }

    fn infer(&mut self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        let y_pred = self.model.forward(&self.params, x)?;
        Ok(y_pred.to_owned())
    }
}
