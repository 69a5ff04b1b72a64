//! Error types for the recommendation pipeline.
//!
//! Only two failures are ever surfaced to a caller: a bad upload and an
//! unavailable vision model. Everything downstream of a successful vision call
//! degrades instead (see [`crate::outcome::FailSoft`]).

use thiserror::Error;

/// Fatal errors of a recommendation request
///
/// The `#[derive(Error)]` macro from thiserror implements `Display` from the
/// `#[error(...)]` attributes, so these render directly into log lines and
/// transport-layer responses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    /// The upload was not an image, or carried no bytes
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The vision model could not be reached, rejected our credentials,
    /// or did not answer within the configured timeout
    #[error("Vision model unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl RecommendError {
    /// True when the caller is at fault (maps to a bad-request outcome).
    pub fn is_client_error(&self) -> bool {
        matches!(self, RecommendError::InvalidInput(_))
    }
}

/// Convenience type alias for Results in the recommendation pipeline
pub type Result<T> = std::result::Result<T, RecommendError>;
