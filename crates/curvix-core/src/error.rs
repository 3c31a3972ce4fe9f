use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurvixError {
    /// Control data is inconsistent, or a rational entity was queried before `initialize`.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Parameter {t} outside of domain [{lower}, {upper}]")]
    Domain { t: f64, lower: f64, upper: f64 },

    /// The operation is not implemented for this curve or surface variant.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    Dimensionality { expected: usize, actual: usize },
}

impl CurvixError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// True for a capability gap rather than a computational failure.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}

pub type Result<T> = std::result::Result<T, CurvixError>;
