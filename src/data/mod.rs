//! In-memory datasets, the random mini-batch sampler and the MNIST loader feeding them.

mod dataset;
mod encoding;
pub mod mnist;
mod sampler;

pub use dataset::{Batch, Dataset};
pub use encoding::OneHotEncoder;
pub use sampler::BatchSampler;
