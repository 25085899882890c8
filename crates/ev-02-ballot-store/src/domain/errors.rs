//! Error types for the Ballot Store subsystem.
//!
//! Validation outcomes (caller mistakes, terminal) and system errors
//! (backend trouble) are separate variants so the surrounding HTTP layer can
//! map them to 4xx vs. 5xx without string matching.

use ev_01_secrets::SecretError;
use shared_types::StoreError;
use thiserror::Error;

/// Structural ballot rejection reasons, checked in order; first failure wins.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A valid ballot must carry at least one vote entry.
    #[error("valid ballot carries no vote entries")]
    EmptyVoteDecision,

    /// A spoiled ballot must not carry vote entries.
    #[error("spoiled ballot carries {count} vote entries")]
    SpoiledBallotWithVotes { count: usize },

    /// The listnum does not belong to a candidate of this election.
    #[error("no candidate with listnum {listnum} in this election")]
    UnknownListNumber { listnum: u32 },

    /// A single entry exceeds the per-candidate cap.
    #[error("{votes} votes for listnum {listnum} exceed the per-candidate cap of {cap}")]
    ExceedsCandidateCap { listnum: u32, votes: u32, cap: u32 },

    /// The entries together exceed the per-ballot total.
    #[error("{total} votes on one ballot exceed the limit of {cap}")]
    ExceedsBallotTotal { total: u32, cap: u32 },

    /// The same listnum appears more than once.
    #[error("listnum {listnum} appears more than once on the ballot")]
    DuplicateListNumber { listnum: u32 },
}

/// Failures of `cast`, `reset_test_election`, and `chain_head`.
#[derive(Debug, Error)]
pub enum CastError {
    /// The referenced election is not registered. Terminal.
    #[error("election not found")]
    ElectionNotFound,

    /// The referenced voter is not registered. Terminal.
    #[error("voter not found")]
    VoterNotFound,

    /// Casting outside the voting window. Terminal.
    #[error("election not active at {now} (window [{start}, {end}))")]
    ElectionNotActive { now: u64, start: u64, end: u64 },

    /// The ballot failed structural validation. Terminal.
    #[error("invalid ballot: {0}")]
    InvalidBallot(#[from] ValidationError),

    /// The voter has already cast a ballot in this election. Terminal,
    /// never a transient retry.
    #[error("voter already voted in this election")]
    AlreadyVoted,

    /// Reset requested while the election is running and not flagged as a
    /// test election. Terminal.
    #[error("election is active and is not a test election")]
    ElectionActive,

    /// Ballot secret could not be resolved; the operation aborts and is
    /// never masked with a generated key.
    #[error(transparent)]
    Secret(#[from] SecretError),

    /// Conflict retries exhausted.
    #[error("ballot store busy, retries exhausted")]
    SystemBusy,

    /// Unexpected backend failure; no state change happened.
    #[error("storage failure: {0}")]
    Storage(StoreError),
}

impl CastError {
    /// Whether the error is a validation outcome (4xx-class) rather than a
    /// system error.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            CastError::Secret(_) | CastError::SystemBusy | CastError::Storage(_)
        )
    }
}
