use std::{
    env, fs,
    path::{Path, PathBuf},
};

use log::info;
use machine_learning::specs::TrainerSpec;
use serde::{Deserialize, Serialize};

use crate::{Result, SessionErr, training::DriverConfig};

/// Directory holding the MNIST IDX files.
pub const MNIST_DIR_VAR: &str = "MNIST_DIR";
/// Path of an optional JSON file with a `SessionConfig`.
pub const CONFIG_VAR: &str = "AUTOENCODER_CONFIG";
/// Path the training stats are written to as JSON.
pub const STATS_VAR: &str = "AUTOENCODER_STATS";

/// Everything a `TrainingSession` needs to know before starting.
///
/// Every field has a default, so a JSON file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub data_dir: PathBuf,
    pub train_samples: usize,
    pub batch_size: usize,
    pub epochs: usize,
    pub log_interval: usize,
    pub test_batch_size: usize,
    pub test_samples: usize,
    pub num_visualization: usize,
    /// Raw features are divided by this before training.
    pub pixel_scale: f32,
    /// Seeds the samplers and, unless it has its own, the trainer.
    pub seed: Option<u64>,
    pub stats_path: Option<PathBuf>,
    pub trainer: TrainerSpec,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            data_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("data"),
            train_samples: 60000,
            batch_size: 64,
            epochs: 1,
            log_interval: 500,
            test_batch_size: 256,
            test_samples: 10000,
            num_visualization: 12,
            pixel_scale: 255.0,
            seed: None,
            stats_path: None,
            trainer: TrainerSpec::default(),
        }
    }
}

impl SessionConfig {
    /// Reads a config from a JSON file, missing fields take their default value.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| SessionErr::io(path, e))?;

        serde_json::from_str(&content)
            .map_err(|e| SessionErr::InvalidConfig(format!("'{}': {e}", path.display())))
    }

    /// Builds the config from the environment: the file named by `AUTOENCODER_CONFIG` if set,
    /// then `MNIST_DIR` and `AUTOENCODER_STATS` override the paths.
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var_os(CONFIG_VAR) {
            Some(path) => {
                info!("reading configuration from {}", Path::new(&path).display());
                Self::from_json_file(Path::new(&path))?
            }
            None => Self::default(),
        };

        if let Some(dir) = env::var_os(MNIST_DIR_VAR) {
            config.data_dir = dir.into();
        }

        if let Some(path) = env::var_os(STATS_VAR) {
            config.stats_path = Some(path.into());
        }

        Ok(config)
    }

    /// Checks the config is usable, returning the loop settings for the driver.
    pub fn validate(&self) -> Result<DriverConfig> {
        if !(self.pixel_scale.is_finite() && self.pixel_scale > 0.) {
            return Err(SessionErr::InvalidConfig(format!(
                "pixel_scale must be a positive number, got {}",
                self.pixel_scale
            )));
        }

        if self.num_visualization > self.test_batch_size {
            return Err(SessionErr::InvalidConfig(format!(
                "num_visualization ({}) can't exceed test_batch_size ({})",
                self.num_visualization, self.test_batch_size
            )));
        }

        DriverConfig::new(
            self.train_samples,
            self.batch_size,
            self.epochs,
            self.log_interval,
            self.test_batch_size,
            self.test_samples,
        )
    }

    /// The trainer spec, seeded from `seed` when it doesn't carry its own.
    pub fn trainer_spec(&self) -> TrainerSpec {
        TrainerSpec {
            seed: self.trainer.seed.or(self.seed),
            ..self.trainer.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_reference_run() {
        let config = SessionConfig::default();
        let driver = config.validate().unwrap();

        assert_eq!(driver.iteration_count(), 937);
        assert_eq!(driver.num_test_batches(), 39);
        assert_eq!(config.num_visualization, 12);
        assert!(config.data_dir.ends_with("data"));
    }

    #[test]
    fn partial_json_keeps_the_other_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{ "batch_size": 10, "seed": 5 }"#).unwrap();

        assert_eq!(config.batch_size, 10);
        assert_eq!(config.train_samples, 60000);
        assert_eq!(config.trainer_spec().seed, Some(5));
    }

    #[test]
    fn trainer_seed_wins_over_session_seed() {
        let mut config = SessionConfig {
            seed: Some(1),
            ..Default::default()
        };
        config.trainer.seed = Some(2);

        assert_eq!(config.trainer_spec().seed, Some(2));
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let config = SessionConfig {
            batch_size: 0,
            ..Default::default()
        };

        assert!(matches!(
            config.validate(),
            Err(SessionErr::InvalidConfig(_))
        ));
    }

    #[test]
    fn visualizing_more_than_a_test_batch_is_rejected() {
        let config = SessionConfig {
            num_visualization: 300,
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn unreadable_json_is_an_invalid_config() {
        let path = std::env::temp_dir().join(format!("session-config-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();

        let err = SessionConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, SessionErr::InvalidConfig(_)), "{err}");
    }
}
