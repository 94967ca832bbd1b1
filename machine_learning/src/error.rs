use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug, Clone, PartialEq)]
pub enum MlErr {
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    EmptyModel,
    InvalidInit(String),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MlErr::SizeMismatch {
                what,
                got,
                expected,
            } => {
                format!("There's a size mismatch in {what}, got {got} and expected {expected}")
            }
            MlErr::EmptyModel => "The model has no layers".to_string(),
            MlErr::InvalidInit(reason) => {
                format!("Failed to create the parameter generator: {reason}")
            }
        };

        write!(f, "{s}")
    }
}

impl Error for MlErr {}
