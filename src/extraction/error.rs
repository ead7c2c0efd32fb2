//! Error types for the extraction module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Why a structured extraction failed
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The model API failed or could not be reached
    #[error("Model API error: {0}")]
    Api(String),

    /// The API rejected the credentials
    #[error("Model API rejected the credentials: {0}")]
    Auth(String),

    /// Still rate limited after retrying
    #[error("Model API rate limit exceeded, retry after {0} seconds")]
    RateLimit(u64),

    /// The call did not finish in time
    #[error("Extraction timed out after {0} seconds")]
    Timeout(u64),

    /// The prompt was blocked by the model's safety filters
    #[error("Prompt was blocked: {0}")]
    Blocked(String),

    /// The model answered without any text
    #[error("Model returned no content (finish reason: {0})")]
    EmptyResponse(String),

    /// The answer does not match the clinic schema
    #[error("Model response is not valid clinic data: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

impl From<CrateError> for ExtractionError {
    fn from(err: CrateError) -> Self {
        match err {
            CrateError::Auth(message) => Self::Auth(message),
            CrateError::RateLimit { retry_after_secs } => Self::RateLimit(retry_after_secs),
            other => Self::Api(other.to_string()),
        }
    }
}
