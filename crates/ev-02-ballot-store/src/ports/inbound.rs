//! # Inbound Port (Driving Port)
//!
//! The primary API the Ballot Store exposes to the surrounding HTTP layer.

use crate::domain::errors::CastError;
use serde::{Deserialize, Serialize};
use shared_types::{Ballot, BallotHash, BallotInput, ElectionId, VoterId};

/// The chain tip of one election, for operator spot checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainHead {
    pub serial_id: u64,
    pub ballot_hash: BallotHash,
}

/// Primary API for the Ballot Store subsystem.
pub trait BallotStoreApi: Send + Sync {
    /// Cast a ballot for `voter_id`.
    ///
    /// ## Atomicity
    ///
    /// Ballot, vote rows, and the participation flag commit together;
    /// any failure rolls the whole cast back.
    ///
    /// ## Concurrency
    ///
    /// Casts against the same election are serialised so serials stay
    /// gap-free and each ballot links to its immediate predecessor.
    /// Different elections proceed in parallel.
    ///
    /// ## Errors
    ///
    /// - `ElectionNotFound` / `VoterNotFound`: unknown references
    /// - `ElectionNotActive`: now outside `[start, end)`
    /// - `InvalidBallot`: structural validation failed
    /// - `AlreadyVoted`: the voter's participation flag is already set
    /// - `Secret`: ballot secret unresolvable; nothing was written
    /// - `SystemBusy`: conflict retries exhausted
    fn cast(&self, voter_id: VoterId, input: BallotInput) -> Result<Ballot, CastError>;

    /// Administratively wipe a test election: results, vote rows, ballots,
    /// and all participation flags.
    ///
    /// ## Errors
    ///
    /// - `ElectionNotFound`
    /// - `ElectionActive`: the election has started and is not flagged as a
    ///   test election
    fn reset_test_election(&self, election_id: &ElectionId) -> Result<(), CastError>;

    /// The last ballot's serial and hash, `None` for an empty chain.
    fn chain_head(&self, election_id: &ElectionId) -> Result<Option<ChainHead>, CastError>;
}
