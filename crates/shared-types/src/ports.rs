//! # Storage Ports (Driven Ports)
//!
//! Repository traits the subsystem services are generic over, plus the
//! [`TimeSource`] abstraction.
//!
//! Production and tests both use `shared-store`'s in-memory adapter (with an
//! optional file snapshot); a SQL-backed adapter only has to implement these
//! traits to slot in.

use crate::entities::{
    Ballot, BallotId, BallotVote, Candidate, CastCommit, Election, ElectionId,
    ParticipationStats, StoredResult, Timestamp, Voter, VoterId, VoterParticipation,
};
use crate::errors::StoreError;
use std::sync::atomic::{AtomicU64, Ordering};

/// Registration-side reads and inserts.
///
/// Inserts are used by the surrounding import layer and by test fixtures;
/// the core itself only reads.
pub trait ElectionRepository: Send + Sync {
    /// Insert an election.
    ///
    /// ## Errors
    ///
    /// - `InvalidEntity`: `seats_to_fill < 1`, `votes_per_ballot < 1`, or
    ///   `end <= start`
    /// - `Conflict`: id already registered
    fn insert_election(&self, election: Election) -> Result<(), StoreError>;

    /// Look up an election by id.
    fn election(&self, id: &ElectionId) -> Result<Option<Election>, StoreError>;

    /// Ids of all registered elections (unordered).
    fn election_ids(&self) -> Result<Vec<ElectionId>, StoreError>;

    /// Insert a candidate.
    ///
    /// ## Errors
    ///
    /// - `InvalidEntity`: `listnum < 1`
    /// - `Conflict`: `(election_id, listnum)` already taken
    /// - `NotFound`: election not registered
    fn insert_candidate(&self, candidate: Candidate) -> Result<(), StoreError>;

    /// Candidates of an election, ordered by `listnum` ascending.
    fn candidates(&self, election_id: &ElectionId) -> Result<Vec<Candidate>, StoreError>;

    /// Insert a voter.
    ///
    /// ## Errors
    ///
    /// - `Conflict`: id or external id already registered
    fn insert_voter(&self, voter: Voter) -> Result<(), StoreError>;

    /// Look up a voter by id.
    fn voter(&self, id: &VoterId) -> Result<Option<Voter>, StoreError>;

    /// Create the participation row `(voter, election) -> voted = false`.
    /// Idempotent when the row already exists.
    fn register_participant(
        &self,
        voter_id: &VoterId,
        election_id: &ElectionId,
    ) -> Result<(), StoreError>;

    /// Read the participation row, if any.
    fn participation(
        &self,
        voter_id: &VoterId,
        election_id: &ElectionId,
    ) -> Result<Option<VoterParticipation>, StoreError>;

    /// Turnout counters for an election.
    fn participation_stats(
        &self,
        election_id: &ElectionId,
    ) -> Result<ParticipationStats, StoreError>;
}

/// Ballot chain reads and the atomic cast commit.
pub trait BallotRepository: Send + Sync {
    /// The chain tip: ballot with the highest `serial_id`, if any.
    fn last_ballot(&self, election_id: &ElectionId) -> Result<Option<Ballot>, StoreError>;

    /// All ballots of an election ordered by `serial_id` ascending.
    fn ballots_ordered(&self, election_id: &ElectionId) -> Result<Vec<Ballot>, StoreError>;

    /// Vote rows of one ballot, ordered by `listnum` ascending.
    /// Empty for invalid ballots.
    fn votes_for_ballot(&self, ballot_id: &BallotId) -> Result<Vec<BallotVote>, StoreError>;

    /// `(valid, invalid)` ballot counts for an election.
    fn ballot_counts(&self, election_id: &ElectionId) -> Result<(u64, u64), StoreError>;

    /// Atomically append a ballot, its vote rows, and upsert the voter's
    /// participation flag to true.
    ///
    /// ## Atomicity
    ///
    /// All three writes land or none do.
    ///
    /// ## Errors
    ///
    /// - `Conflict`: chain tip moved past `expected_previous_serial`, or the
    ///   participation flag is already true (lost race)
    fn commit_cast(&self, commit: CastCommit) -> Result<(), StoreError>;

    /// Administrative reset: atomically delete all results, vote rows, and
    /// ballots of the election and set every participation flag back to
    /// false. Callers enforce the test-election guard.
    fn clear_election_data(&self, election_id: &ElectionId) -> Result<(), StoreError>;
}

/// Versioned result records.
pub trait ResultRepository: Send + Sync {
    /// Insert a new result version.
    ///
    /// ## Errors
    ///
    /// - `Conflict`: version already exists, or a final result exists
    fn insert_result(&self, result: StoredResult) -> Result<(), StoreError>;

    /// One result version, if present.
    fn result(
        &self,
        election_id: &ElectionId,
        version: u32,
    ) -> Result<Option<StoredResult>, StoreError>;

    /// The highest-version result, if any.
    fn latest_result(&self, election_id: &ElectionId) -> Result<Option<StoredResult>, StoreError>;

    /// Highest existing version number (0 when no result exists).
    fn max_version(&self, election_id: &ElectionId) -> Result<u32, StoreError>;

    /// The final result, if one has been marked.
    fn final_result(&self, election_id: &ElectionId) -> Result<Option<StoredResult>, StoreError>;

    /// Atomically set `is_final = true` on one version.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no result at this version
    /// - `Conflict`: a final result already exists (this version or another)
    fn mark_final(&self, election_id: &ElectionId, version: u32) -> Result<(), StoreError>;
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Current unix timestamp in seconds.
    fn now(&self) -> Timestamp;
}

/// Default time source using system time.
#[derive(Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Controllable time source for unit tests.
pub struct MockTimeSource {
    now: AtomicU64,
}

impl MockTimeSource {
    /// Create a mock reporting `now`.
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    /// Move the clock for test scenarios.
    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}
