use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The request could not reach the provider or the connection broke
    /// while reading the response.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The request returns a non-OK status code. The message is the
    /// provider's `error.message` when the body carries one, else
    /// `HTTP <status>`.
    #[error("{1}")]
    StatusCode(reqwest::StatusCode, String),
    /// Every attempt allowed by the retry policy failed with a retryable
    /// error.
    #[error("Request failed repeatedly after {attempts} attempts; check your network connection")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<GenerateError>,
    },
    /// The response envelope does not have the shape we read from. (e.g. no
    /// candidates returned)
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Coarse classification of a failure, used by callers to decide how to
/// present it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    MalformedResponse,
    Parse,
    Validation,
}

impl GenerateError {
    /// Whether another attempt of the same request may succeed.
    /// Connectivity failures, 429 and 5xx responses are transient. A request
    /// that could not be built (e.g. an invalid URL) fails the same way every
    /// time.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(error) => !error.is_builder(),
            Self::StatusCode(status, _) => {
                *status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            Self::InvalidInput(_) | Self::RetriesExhausted { .. } | Self::MalformedResponse(_) => {
                false
            }
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::Validation,
            Self::Transport(_) | Self::StatusCode(..) | Self::RetriesExhausted { .. } => {
                ErrorKind::Network
            }
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }
}

pub type GenerateResult<T> = Result<T, GenerateError>;
