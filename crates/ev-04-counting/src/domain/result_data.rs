//! # Result Payloads
//!
//! The algorithm output stored in a result record's `result_data` field.

use serde::{Deserialize, Serialize};
use shared_types::{Candidate, CountingMethod};

/// One candidate's line in a counted result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub listnum: u32,
    pub firstname: String,
    pub lastname: String,
    pub votes: u64,
    /// Share of the total valid vote tally, in percent.
    pub percentage: f64,
    pub is_elected: bool,
    /// Contender of an unresolved decisive-seat tie.
    pub is_tie: bool,
}

/// Seats assigned to one list under a proportional method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAllocation {
    pub listnum: u32,
    pub firstname: String,
    pub lastname: String,
    pub votes: u64,
    pub seats: u32,
}

/// Result payload of the candidate-based algorithms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateCount {
    pub algorithm: CountingMethod,
    pub total_votes: u64,
    pub valid_ballots: u64,
    pub invalid_ballots: u64,
    pub ties_detected: bool,
    /// Human-readable description naming the tied candidates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tie_info: Option<String>,
    pub all_candidates: Vec<CandidateResult>,
    /// Seat table; present for the proportional methods only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocation: Option<Vec<SeatAllocation>>,
    /// Set by `highest_votes_absolute` when a top-seat candidate missed the
    /// 50% threshold and the seat stayed unfilled.
    #[serde(default)]
    pub majority_not_reached: bool,
}

/// Referendum verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferendumOutcome {
    Accepted,
    Rejected,
}

/// Result payload of `yes_no_referendum`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferendumCount {
    pub algorithm: CountingMethod,
    pub total_votes: u64,
    pub valid_ballots: u64,
    pub invalid_ballots: u64,
    pub yes_votes: u64,
    pub no_votes: u64,
    pub abstain_votes: u64,
    pub yes_percentage: f64,
    pub no_percentage: f64,
    pub abstain_percentage: f64,
    pub result: ReferendumOutcome,
}

/// The stored result payload, tagged by shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultData {
    Candidates(CandidateCount),
    Referendum(ReferendumCount),
}

/// Render the human-readable tie description for `tie_info`.
pub fn describe_tie(contenders: &[&Candidate]) -> String {
    let names: Vec<String> = contenders
        .iter()
        .map(|c| format!("{} {} (list {})", c.firstname, c.lastname, c.listnum))
        .collect();
    format!("Tie between: {}", names.join(", "))
}
