//! Error types for the Counting Engine subsystem.

use shared_types::StoreError;
use thiserror::Error;

/// Failures of `count`, `finalize`, and `get_results`.
#[derive(Debug, Error)]
pub enum CountError {
    /// The referenced election is not registered. Terminal.
    #[error("election not found")]
    ElectionNotFound,

    /// Counting before the voting window closed. Terminal.
    #[error("election has not ended (now {now}, end {end})")]
    ElectionNotEnded { now: u64, end: u64 },

    /// A final result exists; no further counting or finalisation. Terminal.
    #[error("election result is already finalized")]
    AlreadyFinalized,

    /// The election has no counting method configured. Terminal.
    #[error("no counting method configured for this election")]
    MethodNotConfigured,

    /// The requested result version does not exist. Terminal.
    #[error("result not found")]
    ResultNotFound,

    /// Result payload could not be encoded.
    #[error("result serialization failed: {message}")]
    Serialization { message: String },

    /// Unexpected backend failure; no state change happened.
    #[error("storage failure: {0}")]
    Storage(StoreError),
}

impl CountError {
    /// Whether the error is a validation outcome rather than a system error.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            CountError::Serialization { .. } | CountError::Storage(_)
        )
    }
}
