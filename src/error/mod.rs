// Error types for the captiond service

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Request and service errors.
///
/// The first three variants are the user-visible failure modes of the
/// compositing pipeline. Their `Display` strings are the exact one-line
/// messages returned to clients; the inner detail is for logs only.
#[derive(Error, Debug)]
pub enum CaptionError {
    /// Source URL unreachable, unparsable, or the origin answered non-2xx.
    #[error("Invalid URL")]
    Fetch(String),

    /// Fetched bytes are not a decodable image in a supported format.
    #[error("Invalid or unsupported image")]
    Decode(String),

    /// Source dimensions (or response size) exceed the configured bounds.
    #[error("Image is too large")]
    TooLarge(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CaptionError {
    /// Detail string carried by the pipeline variants, for logging.
    pub fn detail(&self) -> Option<&str> {
        match self {
            CaptionError::Fetch(d) | CaptionError::Decode(d) | CaptionError::TooLarge(d) => {
                Some(d)
            }
            _ => None,
        }
    }

    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            CaptionError::Fetch(_) | CaptionError::Decode(_) | CaptionError::TooLarge(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Pipeline failures surface as 400 with a one-line plain-text body; anything
// else is an operational fault and maps to 500.
impl IntoResponse for CaptionError {
    fn into_response(self) -> Response {
        (self.status(), format!("{}\n", self)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, CaptionError>;
