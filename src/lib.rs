//! Trains a fully connected autoencoder on MNIST.
//!
//! A [`TrainingSession`] owns the datasets, the model and the [`TrainingDriver`] looping over
//! random mini-batches drawn by a [`BatchSampler`]. The model is only seen through
//! [`machine_learning::training::Trainable`].

pub mod config;
pub mod data;
pub mod error;
pub mod training;

pub use config::SessionConfig;
pub use data::{Batch, BatchSampler, Dataset};
pub use error::{Result, SessionErr};
pub use training::{TrainingDriver, TrainingSession, TrainingStats};
