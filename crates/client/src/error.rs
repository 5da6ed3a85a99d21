use regulus_core::ArgumentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    InvalidArgument(#[from] ArgumentError),
    #[error("regulations.gov returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("request to regulations.gov failed: {0}")]
    Transport(String),
    #[error("could not decode response body: {0}")]
    Decode(String),
    #[error("invalid request url: {0}")]
    Url(String),
}

impl ClientError {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// HTTP status attached to the failure, when there was a response at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
