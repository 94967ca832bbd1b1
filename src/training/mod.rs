//! The training loop over a `Trainable` and the session owning everything it runs on.

mod driver;
mod session;
mod stats;

pub use driver::{DriverConfig, DriverState, TrainingDriver};
pub use session::{Reconstruction, SessionReport, TrainingSession};
pub use stats::{EvaluationReport, StatsEntry, TrainingStats};
