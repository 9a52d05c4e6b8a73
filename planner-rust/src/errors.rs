use thiserror::Error;
use wayfarer_sdk::{ErrorKind, GenerateError};

#[derive(Debug, Error)]
pub enum PlannerError {
    /// A client-side guard rejected the operation before any request was
    /// sent: empty input or no API key configured.
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    /// The generated text does not decode into the expected structure.
    #[error("Could not parse model output: {reason}")]
    Parse { reason: String, text: String },
    /// The generated structure decoded but has the wrong number of entries.
    #[error("Expected {expected} entries in {field}, got {actual}")]
    UnexpectedCount {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Credential store error: {0}")]
    Credential(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlannerError {
    pub(crate) fn parse(error: &serde_json::Error, text: &str) -> Self {
        Self::Parse {
            reason: error.to_string(),
            text: text.to_string(),
        }
    }

    /// Where the failure falls in the error taxonomy. Configuration and
    /// storage problems are reported as validation failures since the user
    /// has to fix them before retrying.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Generate(error) => error.kind(),
            Self::Parse { .. } | Self::UnexpectedCount { .. } => ErrorKind::Parse,
            Self::Validation(_) | Self::Config(_) | Self::Credential(_) | Self::Io(_) => {
                ErrorKind::Validation
            }
        }
    }
}
