pub mod activations;
pub mod layers;
pub mod loss;
pub mod metrics;
mod model;
mod sequential;

pub use model::Model;
pub use sequential::Sequential;
