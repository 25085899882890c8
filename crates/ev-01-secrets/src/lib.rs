//! # Secret Provider (ev-01)
//!
//! Resolves named secrets for the election core, most importantly
//! `BALLOT_SECRET`, the server-held key mixed into every ballot hash.
//!
//! ## Lookup order
//!
//! 1. File at `<secrets_dir>/<name>` (container-secret convention,
//!    default `/run/secrets`)
//! 2. Process environment variable `<name>`
//!
//! Neither present -> [`SecretError::SecretMissing`]. A missing secret is
//! never masked with a generated one; casting and verification abort.
//!
//! ## Caching
//!
//! Values are cached after the first successful read. [`FileEnvSecretProvider::reload`]
//! drops the cache explicitly; nothing reloads behind the caller's back.

pub mod error;
pub mod provider;
pub mod secret;

pub use error::SecretError;
pub use provider::{FileEnvSecretProvider, SecretProvider, StaticSecretProvider, DEFAULT_SECRETS_DIR};
pub use secret::BallotSecret;

/// Name of the secret every ballot hash is keyed with.
pub const BALLOT_SECRET: &str = "BALLOT_SECRET";
