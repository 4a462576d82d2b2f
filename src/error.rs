// Error type for a single HTTP attempt against the API. The CLI layer wraps
// these in `anyhow` with context; this enum only classifies what went wrong.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of one request (login, register or probe).
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout and other transport errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-2xx status.
    #[error("{status} - {body}")]
    Status { status: StatusCode, body: String },
    /// A 2xx auth response without a usable `data.token`.
    #[error("response missing data.token")]
    MissingToken,
    /// The body was not the JSON we expected.
    #[error("invalid json body: {0}")]
    Decode(#[from] serde_json::Error),
    /// The token contains characters that are not valid in a header.
    #[error("token is not a valid header value")]
    InvalidToken,
}

impl ApiError {
    /// HTTP status attached to the error, if the server responded at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(e) => e.status(),
            _ => None,
        }
    }
}
