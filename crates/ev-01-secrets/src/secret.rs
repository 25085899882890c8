//! # Ballot Secret Type
//!
//! Wrapper for the ballot-hashing secret that zeroizes memory on drop.
//!
//! ## Security
//!
//! The secret keys every ballot hash; leaking it allows recomputing valid
//! hashes for tampered ballots. The wrapper zeroes the backing string when
//! dropped and never prints the value through `Debug` or `Display`.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A resolved secret value that zeroizes on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct BallotSecret {
    inner: String,
}

impl BallotSecret {
    /// Wrap a resolved secret value.
    pub fn new(value: String) -> Self {
        Self { inner: value }
    }

    /// Expose the secret for hashing (use immediately, do not store).
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Whether the secret is empty (rejected by the provider).
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl std::fmt::Debug for BallotSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the actual secret
        f.write_str("BallotSecret(***)")
    }
}
