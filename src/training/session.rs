use log::info;
use machine_learning::training::{Trainable, TrainerBuilder};
use ndarray::{Array2, s};
use rand::{Rng, rngs::StdRng};

use super::{DriverConfig, EvaluationReport, TrainingDriver, TrainingStats};
use crate::{
    Result, SessionConfig, SessionErr,
    data::{
        BatchSampler,
        mnist::{self, Split},
    },
};

/// Held-out images next to the model's reconstruction of them, both in pixel range.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    pub originals: Array2<f32>,
    pub reconstructed: Array2<f32>,
}

/// Everything a finished session produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub stats: TrainingStats,
    pub evaluation: EvaluationReport,
    pub reconstruction: Reconstruction,
}

/// A single training run: its data, its model and the driver looping over them.
pub struct TrainingSession<R: Rng = StdRng> {
    config: SessionConfig,
    train: BatchSampler<R>,
    test: BatchSampler<R>,
    model: Box<dyn Trainable>,
    driver: TrainingDriver,
}

impl TrainingSession<StdRng> {
    /// Loads MNIST from `config.data_dir`, normalizes it and builds the model from
    /// `config.trainer`.
    ///
    /// # Returns
    /// The session or the first error found, always before any training happens.
    pub fn from_config(config: SessionConfig) -> Result<Self> {
        config.validate()?;

        let spec = config.trainer_spec();
        let model = TrainerBuilder::new().build(&spec)?;

        let mut train = mnist::load(&config.data_dir, Split::Train, Some(config.train_samples))?;
        let mut test = mnist::load(&config.data_dir, Split::Test, None)?;
        train.normalize(config.pixel_scale);
        test.normalize(config.pixel_scale);

        let width = train.features().ncols();

        match spec.model.io_dims() {
            Some((input, output)) if input != width || output != width => {
                return Err(SessionErr::InvalidConfig(format!(
                    "model maps {input} features to {output}, images have {width} pixels"
                )));
            }
            _ => {}
        }

        let train = BatchSampler::from_seed(train, config.seed);
        let test = BatchSampler::from_seed(test, config.seed.map(|seed| seed.wrapping_add(1)));

        Self::new(config, train, test, model)
    }
}

impl<R: Rng> TrainingSession<R> {
    /// Creates a new `TrainingSession` from already built parts.
    ///
    /// # Arguments
    /// * `config` - The session's configuration.
    /// * `train` - The sampler over the training split, features already normalized.
    /// * `test` - The sampler over the test split, features already normalized.
    /// * `model` - The model to train.
    ///
    /// # Returns
    /// The session or an error if the config is invalid or a batch wouldn't fit its split.
    pub fn new(
        config: SessionConfig,
        train: BatchSampler<R>,
        test: BatchSampler<R>,
        model: Box<dyn Trainable>,
    ) -> Result<Self> {
        let driver_config = config.validate()?;
        check_fits(&driver_config, &train, &test)?;

        Ok(Self {
            config,
            train,
            test,
            model,
            driver: TrainingDriver::new(driver_config),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn driver(&self) -> &TrainingDriver {
        &self.driver
    }

    /// Trains, evaluates and reconstructs `num_visualization` test images, in that order.
    ///
    /// Writes the stats to `stats_path` once training is over, when set.
    pub fn run(&mut self) -> Result<SessionReport> {
        let stats = self
            .driver
            .run_training(self.model.as_mut(), &mut self.train)?;

        if let Some(path) = &self.config.stats_path {
            stats.write_json(path)?;
            info!("training stats written to {}", path.display());
        }

        let evaluation = self
            .driver
            .run_evaluation(self.model.as_mut(), &mut self.test)?;
        let reconstruction = self.reconstruct(self.config.num_visualization)?;

        Ok(SessionReport {
            stats,
            evaluation,
            reconstruction,
        })
    }

    /// Draws a test batch and runs the model on its first `n` images.
    ///
    /// # Returns
    /// The images and their reconstruction scaled back by `pixel_scale`, or
    /// `SessionErr::InvalidBatchSize` unless `0 < n <= test_batch_size`.
    pub fn reconstruct(&mut self, n: usize) -> Result<Reconstruction> {
        let batch_size = self.config.test_batch_size;

        if n == 0 || n > batch_size {
            return Err(SessionErr::InvalidBatchSize {
                requested: n,
                available: batch_size,
            });
        }

        let batch = self.test.next_batch(batch_size)?;
        let originals = batch.features.slice(s![..n, ..]);
        let reconstructed = self.model.infer(originals)?;

        let scale = self.config.pixel_scale;
        Ok(Reconstruction {
            originals: originals.mapv(|x| x * scale),
            reconstructed: reconstructed.mapv(|x| x * scale),
        })
    }
}

fn check_fits<R: Rng>(
    config: &DriverConfig,
    train: &BatchSampler<R>,
    test: &BatchSampler<R>,
) -> Result<()> {
    for (batch_size, available) in [
        (config.batch_size(), train.len()),
        (config.test_batch_size(), test.len()),
    ] {
        if batch_size > available {
            return Err(SessionErr::InvalidBatchSize {
                requested: batch_size,
                available,
            });
        }
    }

    Ok(())
}
