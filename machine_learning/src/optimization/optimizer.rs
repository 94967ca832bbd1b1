use crate::{MlErr, Result};

/// Defines the strategy for updating model parameters based on calculated gradients.
pub trait Optimizer {
    /// Updates the provided slice of parameters using the batch gradient.
    ///
    /// # Arguments
    /// * `grad` - A reference to the model's gradient.
    /// * `params` - The parameters to update.
    ///
    /// # Returns
    /// An error if there's a mismatch in the sizes of `grad` and `params`.
    fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<()>;
}

/// Fails with `MlErr::SizeMismatch` unless `grad` and `params` have the same length.
pub(super) fn check_lens(grad: &[f32], params: &[f32]) -> Result<()> {
    if grad.len() != params.len() {
        return Err(MlErr::SizeMismatch {
            what: "optimizer gradient",
            got: grad.len(),
            expected: params.len(),
        });
    }

    Ok(())
}

/// Fails with `MlErr::SizeMismatch` unless the optimizer's per-parameter state covers `params`.
pub(super) fn check_state(state_len: usize, params: &[f32]) -> Result<()> {
    if state_len != params.len() {
        return Err(MlErr::SizeMismatch {
            what: "optimizer state",
            got: params.len(),
            expected: state_len,
        });
    }

    Ok(())
}
