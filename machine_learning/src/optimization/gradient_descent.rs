use super::{Optimizer, optimizer::check_lens};
use crate::Result;

#[derive(Debug)]
pub struct GradientDescent {
    learning_rate: f32,
}

impl GradientDescent {
    /// Creates a new `GradientDescent` optimizer.
    ///
    /// # Arguments
    /// * `learning_rate` - The small coefficient that modulates the amount of training per update.
    ///
    /// # Returns
    /// A new `GradientDescent` instance.
    pub fn new(learning_rate: f32) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for GradientDescent {
    fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<()> {
        check_lens(grad, params)?;

        let lr = self.learning_rate;

        for (p, g) in params.iter_mut().zip(grad) {
            *p -= lr * g;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_against_the_gradient() {
        let mut optimizer = GradientDescent::new(0.5);
        let mut params = [1.0, -1.0];

        optimizer.update_params(&[2.0, -4.0], &mut params).unwrap();

        assert_eq!(params, [0.0, 1.0]);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let mut optimizer = GradientDescent::new(0.5);
        let mut params = [1.0, -1.0];

        assert!(optimizer.update_params(&[2.0], &mut params).is_err());
        assert_eq!(params, [1.0, -1.0]);
    }
}
