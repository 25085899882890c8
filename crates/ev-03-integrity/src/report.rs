//! # Integrity Reports
//!
//! Finding types emitted by the verifier. Findings carry both the expected
//! and the actually stored value so operators can see what was altered.

use serde::{Deserialize, Serialize};
use shared_types::ElectionId;

/// The kind of integrity finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    /// Recomputed hash differs from the stored one: the vote payload (or the
    /// stored hash itself) was altered.
    HashMismatch,
    /// The first ballot claims a predecessor.
    InvalidGenesis,
    /// A ballot's stored predecessor pointer does not match the predecessor's
    /// stored hash: ordering/link tampering.
    ChainBroken,
}

/// One finding at one ballot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub serial_id: u64,
    /// What the chain implies the value should be.
    pub expected: Option<String>,
    /// What is actually stored.
    pub actual: Option<String>,
    pub message: String,
}

/// Verification result for one election.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub election_id: ElectionId,
    /// Ballots examined.
    pub total: u64,
    /// Ballots with no finding of either kind.
    pub verified: u64,
    pub errors: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    /// Whether the whole chain verified cleanly.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Aggregate over all elections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub elections: Vec<IntegrityReport>,
    pub total_ballots: u64,
    pub total_verified: u64,
    pub total_errors: u64,
}

impl SweepReport {
    /// Build the aggregate from per-election reports.
    pub fn from_reports(elections: Vec<IntegrityReport>) -> Self {
        let total_ballots = elections.iter().map(|r| r.total).sum();
        let total_verified = elections.iter().map(|r| r.verified).sum();
        let total_errors = elections.iter().map(|r| r.errors.len() as u64).sum();
        Self {
            elections,
            total_ballots,
            total_verified,
            total_errors,
        }
    }
}
