use std::num::NonZeroUsize;

use log::{debug, info};
use machine_learning::training::Trainable;
use rand::Rng;

use super::{EvaluationReport, TrainingStats};
use crate::{Result, SessionErr, data::BatchSampler};

/// Immutable loop bounds of a `TrainingDriver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    train_samples: NonZeroUsize,
    batch_size: NonZeroUsize,
    epochs: NonZeroUsize,
    log_interval: NonZeroUsize,
    test_batch_size: NonZeroUsize,
    test_samples: NonZeroUsize,
}

impl DriverConfig {
    /// Creates a new driver configuration.
    ///
    /// # Arguments
    /// * `train_samples` - Samples per epoch, counted rather than covered.
    /// * `batch_size` - Rows per training batch.
    /// * `epochs` - Number of epochs to train for.
    /// * `log_interval` - Record and print the stats every this many iterations.
    /// * `test_batch_size` - Rows per evaluation batch.
    /// * `test_samples` - Samples to evaluate over.
    ///
    /// # Returns
    /// The config or `SessionErr::InvalidConfig` if any value is zero, the total sample count
    /// overflows or there isn't a single full test batch.
    pub fn new(
        train_samples: usize,
        batch_size: usize,
        epochs: usize,
        log_interval: usize,
        test_batch_size: usize,
        test_samples: usize,
    ) -> Result<Self> {
        let non_zero = |name: &str, value: usize| {
            NonZeroUsize::new(value)
                .ok_or_else(|| SessionErr::InvalidConfig(format!("{name} must be greater than 0")))
        };

        let config = Self {
            train_samples: non_zero("train_samples", train_samples)?,
            batch_size: non_zero("batch_size", batch_size)?,
            epochs: non_zero("epochs", epochs)?,
            log_interval: non_zero("log_interval", log_interval)?,
            test_batch_size: non_zero("test_batch_size", test_batch_size)?,
            test_samples: non_zero("test_samples", test_samples)?,
        };

        if train_samples.checked_mul(epochs).is_none() {
            return Err(SessionErr::InvalidConfig(format!(
                "train_samples ({train_samples}) times epochs ({epochs}) overflows"
            )));
        }

        if config.num_test_batches() == 0 {
            return Err(SessionErr::InvalidConfig(format!(
                "test_samples ({test_samples}) must hold at least one test batch of {test_batch_size}"
            )));
        }

        Ok(config)
    }

    /// `floor(train_samples * epochs / batch_size)`.
    pub fn iteration_count(&self) -> usize {
        self.train_samples.get() * self.epochs.get() / self.batch_size.get()
    }

    /// `floor(test_samples / test_batch_size)`.
    pub fn num_test_batches(&self) -> usize {
        self.test_samples.get() / self.test_batch_size.get()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }

    pub fn log_interval(&self) -> usize {
        self.log_interval.get()
    }

    pub fn test_batch_size(&self) -> usize {
        self.test_batch_size.get()
    }
}

/// The single path a driver goes through: `Idle -> Training -> Evaluating -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Training,
    Evaluating,
    Done,
}

impl DriverState {
    fn name(self) -> &'static str {
        match self {
            DriverState::Idle => "idle",
            DriverState::Training => "training",
            DriverState::Evaluating => "evaluating",
            DriverState::Done => "done",
        }
    }
}

/// Runs the training loop and the evaluation after it.
///
/// The driver never looks inside the model: it hands batches to a `Trainable` and keeps
/// whatever loss and error it reports back. Errors from the sampler or the model end the run,
/// leaving the driver in the state it failed in.
#[derive(Debug)]
pub struct TrainingDriver {
    config: DriverConfig,
    state: DriverState,
}

impl TrainingDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            state: DriverState::Idle,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    fn transition(&mut self, from: DriverState, to: DriverState) -> Result<()> {
        if self.state != from {
            return Err(SessionErr::InvalidState {
                expected: from.name(),
                got: self.state.name(),
            });
        }

        debug!("driver {} -> {}", from.name(), to.name());
        self.state = to;
        Ok(())
    }

    /// Trains `model` for `iteration_count` batches drawn from `sampler`, the features being
    /// both input and target.
    ///
    /// # Returns
    /// The stats logged every `log_interval` iterations, or the first error. A non-finite loss
    /// is `SessionErr::ModelDivergence`.
    pub fn run_training<T, R>(
        &mut self,
        model: &mut T,
        sampler: &mut BatchSampler<R>,
    ) -> Result<TrainingStats>
    where
        T: Trainable + ?Sized,
        R: Rng,
    {
        self.transition(DriverState::Idle, DriverState::Training)?;

        let iterations = self.config.iteration_count();
        let batch_size = self.config.batch_size();
        let log_interval = self.config.log_interval();
        let mut stats = TrainingStats::new();
        info!("training for {iterations} iterations of {batch_size} samples");

        for i in 0..iterations {
            let batch = sampler.next_batch(batch_size)?;
            let features = batch.features.view();
            let step = model.train_on_batch(features, features)?;

            if !step.loss.is_finite() {
                return Err(SessionErr::ModelDivergence {
                    iteration: i,
                    loss: step.loss,
                });
            }

            if i % log_interval == 0 {
                stats.record(i, step.loss, step.error);
                println!(
                    "Minibatch: {i}, Loss: {:.3}, Error: {:.2}%",
                    step.loss,
                    step.error * 100.
                );
            }
        }

        self.transition(DriverState::Training, DriverState::Evaluating)?;
        Ok(stats)
    }

    /// Evaluates `model` over `num_test_batches` batches drawn from `sampler`.
    ///
    /// # Returns
    /// The accumulated error and its average as a percentage, or the first error.
    pub fn run_evaluation<T, R>(
        &mut self,
        model: &mut T,
        sampler: &mut BatchSampler<R>,
    ) -> Result<EvaluationReport>
    where
        T: Trainable + ?Sized,
        R: Rng,
    {
        if self.state != DriverState::Evaluating {
            return Err(SessionErr::InvalidState {
                expected: DriverState::Evaluating.name(),
                got: self.state.name(),
            });
        }

        let batches = self.config.num_test_batches();
        let batch_size = self.config.test_batch_size();
        let mut total_error = 0.;
        info!("evaluating over {batches} batches of {batch_size} samples");

        for _ in 0..batches {
            let batch = sampler.next_batch(batch_size)?;
            let features = batch.features.view();
            total_error += model.evaluate_on_batch(features, features)?;
        }

        let average_error = total_error * 100. / batches as f32;
        println!("Average test error: {average_error:.2}%");

        self.transition(DriverState::Evaluating, DriverState::Done)?;
        Ok(EvaluationReport {
            batches,
            total_error,
            average_error,
        })
    }
}
