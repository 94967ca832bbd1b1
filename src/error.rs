use std::{
    error::Error,
    fmt, io,
    path::{Path, PathBuf},
};

use machine_learning::MlErr;

/// The session's result type.
pub type Result<T> = std::result::Result<T, SessionErr>;

/// Training session failures. Every one of them is terminal for the run.
///
/// A dataset file that can't be read or parsed is `DatasetLoad`, with the io error as its
/// source when there is one. `Io` covers the other files a session touches: the JSON config
/// and the stats output.
#[derive(Debug)]
pub enum SessionErr {
    InvalidBatchSize {
        requested: usize,
        available: usize,
    },
    DatasetLoad {
        path: PathBuf,
        reason: String,
        source: Option<io::Error>,
    },
    Io {
        path: PathBuf,
        source: io::Error,
    },
    DatasetShapeMismatch {
        features: usize,
        labels: usize,
    },
    ModelDivergence {
        iteration: usize,
        loss: f32,
    },
    InvalidConfig(String),
    InvalidState {
        expected: &'static str,
        got: &'static str,
    },
    Model(MlErr),
}

impl SessionErr {
    pub(crate) fn dataset_load(path: &Path, reason: impl Into<String>) -> Self {
        Self::DatasetLoad {
            path: path.to_path_buf(),
            reason: reason.into(),
            source: None,
        }
    }

    pub(crate) fn dataset_unreadable(path: &Path, source: io::Error) -> Self {
        Self::DatasetLoad {
            path: path.to_path_buf(),
            reason: source.to_string(),
            source: Some(source),
        }
    }

    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for SessionErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionErr::InvalidBatchSize {
                requested,
                available,
            } => write!(
                f,
                "invalid batch size: requested {requested}, dataset holds {available} samples"
            ),
            SessionErr::DatasetLoad { path, reason, .. } => {
                write!(f, "failed to load dataset '{}': {reason}", path.display())
            }
            SessionErr::Io { path, source } => {
                write!(f, "io error on '{}': {source}", path.display())
            }
            SessionErr::DatasetShapeMismatch { features, labels } => write!(
                f,
                "dataset shape mismatch: {features} feature rows and {labels} label rows"
            ),
            SessionErr::ModelDivergence { iteration, loss } => {
                write!(f, "model diverged at iteration {iteration}: loss is {loss}")
            }
            SessionErr::InvalidConfig(reason) => write!(f, "invalid configuration: {reason}"),
            SessionErr::InvalidState { expected, got } => {
                write!(f, "invalid driver state: expected {expected}, got {got}")
            }
            SessionErr::Model(e) => write!(f, "model error: {e}"),
        }
    }
}

impl Error for SessionErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SessionErr::Io { source, .. } => Some(source),
            SessionErr::DatasetLoad {
                source: Some(source),
                ..
            } => Some(source),
            SessionErr::Model(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MlErr> for SessionErr {
    fn from(value: MlErr) -> Self {
        Self::Model(value)
    }
}
