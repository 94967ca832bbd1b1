use ndarray::{Array1, Zip};

use super::{
    Optimizer,
    optimizer::{check_lens, check_state},
};
use crate::Result;

/// Adam: steps scaled by bias-corrected running estimates of the gradient's first and second
/// moments.
#[derive(Debug)]
pub struct Adam {
    learning_rate: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    steps: i32,
    mean: Array1<f32>,
    variance: Array1<f32>,
}

impl Adam {
    /// Creates a new `Adam` optimizer.
    ///
    /// # Arguments
    /// * `len` - The size of the parameter buffer this optimizer will update.
    /// * `learning_rate` - The small coefficient that modulates the amount of training per update.
    /// * `beta1`, `beta2` - Decay rates of the mean and variance estimates.
    /// * `epsilon` - Added to the denominator so flat directions don't blow up.
    pub fn new(len: usize, learning_rate: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            steps: 0,
            mean: Array1::zeros(len),
            variance: Array1::zeros(len),
        }
    }
}

impl Optimizer for Adam {
    fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<()> {
        check_lens(grad, params)?;
        check_state(self.mean.len(), params)?;

        self.steps = self.steps.saturating_add(1);

        let Self {
            learning_rate: lr,
            beta1: b1,
            beta2: b2,
            epsilon: eps,
            steps,
            ..
        } = *self;

        let mean_correction = 1. - b1.powi(steps);
        let variance_correction = 1. - b2.powi(steps);
        let step_size = lr * variance_correction.sqrt() / mean_correction;

        Zip::from(params)
            .and(grad)
            .and(&mut self.mean)
            .and(&mut self.variance)
            .for_each(|p, &g, m, v| {
                *m = b1 * *m + (1. - b1) * g;
                *v = b2 * *v + (1. - b2) * g * g;
                *p -= step_size * *m / (v.sqrt() + eps);
            });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_moves_each_param_by_the_learning_rate() {
        let mut optimizer = Adam::new(2, 0.1, 0.9, 0.999, 1e-8);
        let mut params = [1.0, 1.0];

        optimizer.update_params(&[3.0, -0.2], &mut params).unwrap();

        assert!((params[0] - 0.9).abs() < 1e-4);
        assert!((params[1] - 1.1).abs() < 1e-4);
    }

    #[test]
    fn zero_gradient_leaves_params_untouched() {
        let mut optimizer = Adam::new(3, 0.1, 0.9, 0.999, 1e-8);
        let mut params = [0.5, -0.5, 2.0];

        optimizer.update_params(&[0.0; 3], &mut params).unwrap();

        assert_eq!(params, [0.5, -0.5, 2.0]);
    }

    #[test]
    fn state_sized_for_other_buffer_is_rejected() {
        let mut optimizer = Adam::new(2, 0.1, 0.9, 0.999, 1e-8);
        let mut params = [0.0; 3];

        assert!(optimizer.update_params(&[0.0; 3], &mut params).is_err());
    }
}
