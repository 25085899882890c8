//! # Shared Types
//!
//! Domain entities and port definitions shared across the BallotChain
//! subsystems.
//!
//! ## Clusters
//!
//! - **Registration**: `Election`, `Voter`, `Candidate` - created by the
//!   surrounding import layer before the core runs
//! - **Casting**: `Ballot`, `BallotVote`, `VoterParticipation`, `BallotInput`
//! - **Results**: `StoredResult` - versioned, finalisable result records
//!
//! ## Ports
//!
//! The storage port traits ([`ElectionRepository`], [`BallotRepository`],
//! [`ResultRepository`]) and the [`TimeSource`] abstraction live here so that
//! every subsystem crate depends only on shared-types, never on a concrete
//! storage adapter.

pub mod entities;
pub mod errors;
pub mod ports;

pub use entities::{
    Ballot, BallotHash, BallotId, BallotInput, BallotVote, Candidate, CandidateId, CastCommit,
    CountingMethod, Election, ElectionId, ElectionType, ParticipationStats, StoredResult,
    Timestamp, VoteEntry, Voter, VoterId, VoterParticipation,
};
pub use errors::StoreError;
pub use ports::{
    BallotRepository, ElectionRepository, MockTimeSource, ResultRepository, SystemTimeSource,
    TimeSource,
};
