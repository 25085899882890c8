//! Error types for the Secret Provider subsystem.

use thiserror::Error;

/// Secret resolution failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SecretError {
    /// Neither the secrets file nor the environment variable exists.
    #[error("secret '{name}' not found in {searched_dir} or environment")]
    SecretMissing { name: String, searched_dir: String },

    /// The secrets file exists but could not be read.
    #[error("failed to read secret file for '{name}': {message}")]
    Unreadable { name: String, message: String },

    /// The resolved value is empty after trimming.
    #[error("secret '{name}' is empty")]
    Empty { name: String },
}
