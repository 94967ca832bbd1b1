use ndarray::{Array1, Zip};

use super::{
    Optimizer,
    optimizer::{check_lens, check_state},
};
use crate::Result;

/// Gradient descent that keeps moving along a decaying sum of the past gradients.
#[derive(Debug)]
pub struct GradientDescentWithMomentum {
    learning_rate: f32,
    momentum: f32,
    velocity: Array1<f32>,
}

impl GradientDescentWithMomentum {
    /// Creates a new `GradientDescentWithMomentum` optimizer.
    ///
    /// # Arguments
    /// * `len` - The size of the parameter buffer this optimizer will update.
    /// * `learning_rate` - The small coefficient that modulates the amount of training per update.
    /// * `momentum` - How much of the previous velocity carries over to the next step.
    pub fn new(len: usize, learning_rate: f32, momentum: f32) -> Self {
        Self {
            learning_rate,
            momentum,
            velocity: Array1::zeros(len),
        }
    }
}

impl Optimizer for GradientDescentWithMomentum {
    fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<()> {
        check_lens(grad, params)?;
        check_state(self.velocity.len(), params)?;

        let Self {
            learning_rate: lr,
            momentum: mu,
            ..
        } = *self;

        Zip::from(params)
            .and(grad)
            .and(&mut self.velocity)
            .for_each(|p, &g, v| {
                *v = mu * *v + g;
                *p -= lr * *v;
            });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_accumulates_between_steps() {
        let mut optimizer = GradientDescentWithMomentum::new(1, 1.0, 0.5);
        let mut params = [0.0];

        optimizer.update_params(&[1.0], &mut params).unwrap();
        assert_eq!(params, [-1.0]);

        // v = 0.5 * 1 + 1
        optimizer.update_params(&[1.0], &mut params).unwrap();
        assert_eq!(params, [-2.5]);
    }

    #[test]
    fn state_sized_for_other_buffer_is_rejected() {
        let mut optimizer = GradientDescentWithMomentum::new(2, 1.0, 0.5);
        let mut params = [0.0; 3];

        assert!(optimizer.update_params(&[1.0; 3], &mut params).is_err());
        assert_eq!(params, [0.0; 3]);
    }
}
