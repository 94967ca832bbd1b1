use ndarray::{Array2, ArrayView2, Zip};

use super::LossFn;

/// Binary cross entropy, summed over the features of a sample and averaged over the batch.
///
/// Predictions are clamped to `[eps, 1 - eps]` so saturated sigmoids don't yield infinities.
#[derive(Clone, Copy, Debug)]
pub struct BinaryCrossEntropy {
    eps: f32,
}

impl BinaryCrossEntropy {
    /// Returns a new `BinaryCrossEntropy`.
    ///
    /// # Arguments
    /// * `eps` - The clamping margin applied to the predictions.
    pub fn new(eps: f32) -> Self {
        Self { eps }
    }

    fn clamp(&self, p: f32) -> f32 {
        p.clamp(self.eps, 1. - self.eps)
    }
}

impl Default for BinaryCrossEntropy {
    fn default() -> Self {
        Self::new(1e-7)
    }
}

impl LossFn for BinaryCrossEntropy {
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> f32 {
        let rows = y_pred.nrows().max(1) as f32;

        let total = Zip::from(&y_pred).and(&y).fold(0., |acc, &p, &t| {
            let p = self.clamp(p);
            acc - (t * p.ln() + (1. - t) * (1. - p).ln())
        });

        total / rows
    }

    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Array2<f32> {
        let rows = y_pred.nrows().max(1) as f32;

        Zip::from(&y_pred).and(&y).map_collect(|&p, &t| {
            let p = self.clamp(p);
            (p - t) / (p * (1. - p)) / rows
        })
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn perfect_prediction_has_near_zero_loss() {
        let y = array![[0.0_f32, 1.0, 1.0]];
        let loss = BinaryCrossEntropy::default().loss(y.view(), y.view());
        assert!(loss < 1e-4, "loss: {loss}");
    }

    #[test]
    fn loss_is_summed_per_sample_and_averaged_over_rows() {
        let y_pred = array![[0.5_f32, 0.5], [0.5, 0.5]];
        let y = array![[1.0_f32, 0.0], [0.0, 1.0]];

        let loss = BinaryCrossEntropy::default().loss(y_pred.view(), y.view());
        let expected = 2. * std::f32::consts::LN_2;

        assert!((loss - expected).abs() < 1e-5, "loss: {loss}");
    }

    #[test]
    fn gradient_through_sigmoid_is_prediction_minus_target() {
        // dL/dp * sigmoid'(z) = (p - t) / rows, with sigmoid'(z) = p * (1 - p)
        let y_pred = array![[0.25_f32, 0.75]];
        let y = array![[0.0_f32, 1.0]];

        let d = BinaryCrossEntropy::default().loss_prime(y_pred.view(), y.view());
        let through_sigmoid = &d * &y_pred.mapv(|p| p * (1. - p));

        assert!((through_sigmoid[[0, 0]] - 0.25).abs() < 1e-5);
        assert!((through_sigmoid[[0, 1]] + 0.25).abs() < 1e-5);
    }
}
