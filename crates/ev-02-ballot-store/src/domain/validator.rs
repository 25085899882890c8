//! # Structural Ballot Validation
//!
//! Checks one submitted ballot against the election's voting rules. Rules
//! run in a fixed order and the first failure wins, so rejection reasons are
//! stable for the caller.

use crate::domain::errors::ValidationError;
use shared_types::{BallotInput, Candidate, Election};
use std::collections::HashSet;

/// Validate a submitted ballot against the election rules.
///
/// Rule order:
///
/// 1. A valid ballot carries at least one entry; a spoiled one carries none.
/// 2. Every `listnum` belongs to a candidate of this election.
/// 3. No entry exceeds the per-candidate cap (`max_cumulative_votes`, or 1
///    when cumulation is disabled).
/// 4. The entry total does not exceed `votes_per_ballot`.
/// 5. No `listnum` appears twice.
pub fn validate_ballot(
    input: &BallotInput,
    election: &Election,
    candidates: &[Candidate],
) -> Result<(), ValidationError> {
    if !input.valid {
        if !input.vote_decision.is_empty() {
            return Err(ValidationError::SpoiledBallotWithVotes {
                count: input.vote_decision.len(),
            });
        }
        return Ok(());
    }

    if input.vote_decision.is_empty() {
        return Err(ValidationError::EmptyVoteDecision);
    }

    let known: HashSet<u32> = candidates.iter().map(|c| c.listnum).collect();
    for entry in &input.vote_decision {
        if !known.contains(&entry.listnum) {
            return Err(ValidationError::UnknownListNumber {
                listnum: entry.listnum,
            });
        }
    }

    let cap = election.candidate_cap();
    for entry in &input.vote_decision {
        if entry.votes > cap {
            return Err(ValidationError::ExceedsCandidateCap {
                listnum: entry.listnum,
                votes: entry.votes,
                cap,
            });
        }
    }

    let total: u32 = input.vote_decision.iter().map(|e| e.votes).sum();
    if total > election.votes_per_ballot {
        return Err(ValidationError::ExceedsBallotTotal {
            total,
            cap: election.votes_per_ballot,
        });
    }

    let mut seen = HashSet::new();
    for entry in &input.vote_decision {
        if !seen.insert(entry.listnum) {
            return Err(ValidationError::DuplicateListNumber {
                listnum: entry.listnum,
            });
        }
    }

    Ok(())
}
