//! Error types for the Integrity Verifier subsystem.
//!
//! Integrity findings are never errors; they land in the report. These
//! variants cover the cases where the verification itself cannot run.

use ev_01_secrets::SecretError;
use shared_types::StoreError;
use thiserror::Error;

/// Failures of the verification run itself.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The referenced election is not registered.
    #[error("election not found")]
    ElectionNotFound,

    /// Ballot secret could not be resolved; without it no hash can be
    /// re-derived.
    #[error(transparent)]
    Secret(#[from] SecretError),

    /// Unexpected backend failure.
    #[error("storage failure: {0}")]
    Storage(StoreError),
}
