use thiserror::Error;

use crate::services::store::StoreError;

/// Engine-level error types
#[derive(Error, Debug)]
pub enum EngineError {
    /// Invalid input (failed payload validation, out-of-range score, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Daily super-like quota exhausted
    #[error("Super-like quota exceeded: {cap} per day")]
    QuotaExceeded { cap: u32 },

    /// Operation applied to an entity in the wrong state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Verification replay on an already verified meeting
    #[error("Meeting already verified")]
    AlreadyVerified,

    /// Referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Record store or gateway failure
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Check if the error is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::NotFound(_))
    }

    /// Only collaborator I/O failures are worth retrying; domain errors are final
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Storage(_))
    }
}

impl From<validator::ValidationErrors> for EngineError {
    fn from(err: validator::ValidationErrors) -> Self {
        EngineError::Validation(err.to_string())
    }
}

// Greeting delivery is collaborator I/O, same retry class as the store
impl From<crate::services::GatewayError> for EngineError {
    fn from(err: crate::services::GatewayError) -> Self {
        EngineError::Storage(StoreError::Unavailable(err.to_string()))
    }
}
