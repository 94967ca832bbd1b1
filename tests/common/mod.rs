#![allow(dead_code)]

use machine_learning::{
    MlErr,
    training::{BatchStats, Trainable},
};
use mnist_autoencoder::{BatchSampler, Dataset};
use ndarray::{Array2, ArrayView2};
use rand::{SeedableRng, rngs::StdRng};

/// A deterministic `Trainable` that reports fixed stats and counts how it's called.
#[derive(Debug, Default)]
pub struct StubModel {
    pub loss: f32,
    pub error: f32,
    /// Loss reported from this training call on, instead of `loss`.
    pub diverge_at: Option<(usize, f32)>,
    /// Errors reported by `evaluate_on_batch`, cycled.
    pub eval_errors: Vec<f32>,
    pub fail: bool,

    pub train_calls: usize,
    pub eval_calls: usize,
    pub infer_calls: usize,
    pub batch_rows: Vec<usize>,
}

impl StubModel {
    pub fn new(loss: f32, error: f32) -> Self {
        Self {
            loss,
            error,
            ..Default::default()
        }
    }

    fn check(&mut self, x: ArrayView2<f32>, y: ArrayView2<f32>) -> machine_learning::Result<()> {
        assert_eq!(x, y, "an autoencoder's targets are its inputs");
        self.batch_rows.push(x.nrows());

        if self.fail {
            return Err(MlErr::EmptyModel);
        }

        Ok(())
    }
}

impl Trainable for StubModel {
    fn train_on_batch(
        &mut self,
        x: ArrayView2<f32>,
        y: ArrayView2<f32>,
    ) -> machine_learning::Result<BatchStats> {
        self.check(x, y)?;
        let call = self.train_calls;
        self.train_calls += 1;

        let loss = match self.diverge_at {
            Some((at, loss)) if call >= at => loss,
            _ => self.loss,
        };

        Ok(BatchStats {
            loss,
            error: self.error,
        })
    }

    fn evaluate_on_batch(
        &mut self,
        x: ArrayView2<f32>,
        y: ArrayView2<f32>,
    ) -> machine_learning::Result<f32> {
        self.check(x, y)?;
        let call = self.eval_calls;
        self.eval_calls += 1;

        if self.eval_errors.is_empty() {
            return Ok(self.error);
        }

        Ok(self.eval_errors[call % self.eval_errors.len()])
    }

    fn infer(&mut self, x: ArrayView2<f32>) -> machine_learning::Result<Array2<f32>> {
        self.infer_calls += 1;
        Ok(x.to_owned())
    }
}

/// `n` rows of `d` features in `[0, 1]`, with row `i` labelled `i`.
pub fn dataset(n: usize, d: usize) -> Dataset {
    let features = Array2::from_shape_fn((n, d), |(i, j)| ((i + j) % 256) as f32 / 255.);
    let labels = Array2::from_shape_fn((n, 1), |(i, _)| i as f32);
    Dataset::new(features, labels).unwrap()
}

pub fn sampler(n: usize, d: usize, seed: u64) -> BatchSampler<StdRng> {
    BatchSampler::new(dataset(n, d), StdRng::seed_from_u64(seed))
}
