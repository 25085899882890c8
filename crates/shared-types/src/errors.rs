//! # Store Errors
//!
//! Error type shared by all storage port implementations.
//!
//! ## Design Principles
//!
//! - Conflicts are distinguishable from hard failures so services can retry
//! - No panics in adapters (use Result instead)

use thiserror::Error;

/// Errors surfaced by the storage ports.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The referenced row does not exist.
    #[error("{what} not found")]
    NotFound { what: &'static str },

    /// A concurrent writer invalidated the caller's snapshot (chain tip
    /// moved, participation flag flipped, version taken). Retryable.
    #[error("write conflict: {message}")]
    Conflict { message: String },

    /// The entity violates a schema-level rule and was rejected on insert.
    #[error("invalid entity: {message}")]
    InvalidEntity { message: String },

    /// Unexpected backend I/O failure.
    #[error("storage I/O error: {message}")]
    Io { message: String },

    /// Snapshot encode/decode failure.
    #[error("serialization error: {message}")]
    Serialization { message: String },
}

impl StoreError {
    /// Convenience constructor for conflict errors.
    pub fn conflict(message: impl Into<String>) -> Self {
        StoreError::Conflict {
            message: message.into(),
        }
    }

    /// Convenience constructor for entity-validation errors.
    pub fn invalid(message: impl Into<String>) -> Self {
        StoreError::InvalidEntity {
            message: message.into(),
        }
    }

    /// Whether a bounded retry may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}
