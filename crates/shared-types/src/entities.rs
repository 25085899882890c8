//! # Core Domain Entities
//!
//! Defines the election core entities.
//!
//! ## Clusters
//!
//! - **Registration**: `Election`, `Voter`, `Candidate`
//! - **Casting**: `Ballot`, `BallotVote`, `VoterParticipation`
//! - **Results**: `StoredResult`

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of an election.
pub type ElectionId = Uuid;

/// Unique identifier of a voter.
pub type VoterId = Uuid;

/// Unique identifier of a candidate.
pub type CandidateId = Uuid;

/// Unique identifier of a ballot.
pub type BallotId = Uuid;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// A lowercase-hex SHA-256 digest over the canonical ballot serialisation.
pub type BallotHash = String;

// =============================================================================
// CLUSTER A: REGISTRATION
// =============================================================================

/// The kind of election being held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectionType {
    MajorityVote,
    ProportionalRepresentation,
    Referendum,
}

/// The algorithm used to turn the tally into a result.
///
/// The five tokens are fixed; import layers map user-facing labels onto them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountingMethod {
    /// Divisor method with divisors 1, 3, 5, ... (proportional).
    SainteLague,
    /// Largest-remainder method (proportional).
    HareNiemeyer,
    /// Plurality: top `seats_to_fill` candidates win.
    HighestVotesSimple,
    /// Plurality with an absolute-majority threshold per elected candidate.
    HighestVotesAbsolute,
    /// Yes/no/abstain referendum.
    YesNoReferendum,
}

/// An election with its voting rules and time window.
///
/// Immutable once any ballot references it, except via the administrative
/// test-election reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Election {
    pub id: ElectionId,
    pub name: String,
    pub election_type: ElectionType,
    /// Must be set before counting; `None` fails counting with a
    /// method-not-configured error.
    pub counting_method: Option<CountingMethod>,
    /// Number of seats distributed by the counting method (>= 1).
    pub seats_to_fill: u32,
    /// Maximum total votes a single ballot may carry (>= 1).
    pub votes_per_ballot: u32,
    /// Per-candidate vote cap. 0 means "no cumulation": at most 1 per candidate.
    pub max_cumulative_votes: u32,
    /// Start of the voting window (inclusive).
    pub start: Timestamp,
    /// End of the voting window (exclusive).
    pub end: Timestamp,
    /// Test elections may be reset even inside the voting window.
    pub test_election: bool,
}

impl Election {
    /// Whether ballots may be cast at `now` (window is `[start, end)`).
    pub fn is_active(&self, now: Timestamp) -> bool {
        now >= self.start && now < self.end
    }

    /// Whether the voting window has closed.
    pub fn has_ended(&self, now: Timestamp) -> bool {
        now >= self.end
    }

    /// Effective per-candidate vote cap: `max_cumulative_votes`, or 1 when 0.
    pub fn candidate_cap(&self) -> u32 {
        self.max_cumulative_votes.max(1)
    }
}

/// A registered voter.
///
/// Ballots never reference voters; the only link between a voter and an
/// election is the boolean participation flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voter {
    pub id: VoterId,
    /// External identifier (LDAP uid, matriculation number, ...). Unique.
    pub external_id: String,
}

/// A candidate standing in one election.
///
/// `(election_id, listnum)` is unique per election; `listnum >= 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub election_id: ElectionId,
    pub listnum: u32,
    pub firstname: String,
    pub lastname: String,
}

// =============================================================================
// CLUSTER B: CASTING
// =============================================================================

/// The participation flag binding a voter to an election.
///
/// At most one row per `(voter_id, election_id)`. Once `voted` is true it
/// never transitions back, except through the test-election reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoterParticipation {
    pub voter_id: VoterId,
    pub election_id: ElectionId,
    pub voted: bool,
}

/// One entry of a ballot's vote decision: `votes` for candidate `listnum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteEntry {
    pub listnum: u32,
    pub votes: u32,
}

/// A ballot as submitted by the surrounding HTTP layer.
///
/// `valid = false` marks an explicitly spoiled ballot; its `vote_decision`
/// is ignored and must be empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallotInput {
    pub election_id: ElectionId,
    pub valid: bool,
    #[serde(default)]
    pub vote_decision: Vec<VoteEntry>,
}

/// A committed ballot in the per-election hash chain.
///
/// `serial_id` is gap-free and strictly monotonic per election;
/// `previous_ballot_hash` is `None` iff this is the first ballot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ballot {
    pub id: BallotId,
    pub election_id: ElectionId,
    pub serial_id: u64,
    pub valid: bool,
    pub ballot_hash: BallotHash,
    pub previous_ballot_hash: Option<BallotHash>,
    pub created_at: Timestamp,
}

/// A per-candidate vote row of a valid ballot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallotVote {
    pub ballot_id: BallotId,
    pub listnum: u32,
    pub votes: u32,
}

/// The unit of atomic commit for `cast`.
///
/// The storage adapter must apply ballot, vote rows, and the participation
/// flag all-or-nothing, and must fail with a conflict when the chain tip or
/// the participation flag moved since the caller observed them.
#[derive(Debug, Clone)]
pub struct CastCommit {
    pub voter_id: VoterId,
    pub ballot: Ballot,
    pub votes: Vec<BallotVote>,
    /// Serial of the chain tip the caller linked against (`None` = empty chain).
    pub expected_previous_serial: Option<u64>,
}

/// Per-election turnout numbers for the surrounding display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipationStats {
    pub eligible: u64,
    pub voted: u64,
}

// =============================================================================
// CLUSTER C: RESULTS
// =============================================================================

/// A versioned, finalisable result record.
///
/// Versions are contiguous from 1 per election. At most one record per
/// election carries `is_final = true`; once it exists no new versions may be
/// created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResult {
    pub election_id: ElectionId,
    pub version: u32,
    /// Algorithm-specific payload produced by the counting engine.
    pub result_data: serde_json::Value,
    pub counted_by: String,
    pub counted_at: Timestamp,
    pub is_final: bool,
}
