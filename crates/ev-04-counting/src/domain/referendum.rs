//! # Referendum Counting
//!
//! `yes_no_referendum`: the fixed option lists are 1 = yes, 2 = no,
//! 3 = abstain. The proposal is `ACCEPTED` when yes votes strictly exceed
//! no votes, `REJECTED` otherwise (a yes/no draw rejects).

use crate::domain::result_data::{ReferendumCount, ReferendumOutcome};
use crate::domain::tally::{percentage, ElectionTally};
use shared_types::CountingMethod;

pub const YES_LISTNUM: u32 = 1;
pub const NO_LISTNUM: u32 = 2;
pub const ABSTAIN_LISTNUM: u32 = 3;

/// Count a yes/no referendum.
pub fn count_referendum(tally: &ElectionTally) -> ReferendumCount {
    let yes_votes = tally.votes_for(YES_LISTNUM);
    let no_votes = tally.votes_for(NO_LISTNUM);
    let abstain_votes = tally.votes_for(ABSTAIN_LISTNUM);
    // Percentages are over the three option totals; the validator guarantees
    // no other listnum can carry votes.
    let total_votes = yes_votes + no_votes + abstain_votes;

    ReferendumCount {
        algorithm: CountingMethod::YesNoReferendum,
        total_votes,
        valid_ballots: tally.valid_ballots,
        invalid_ballots: tally.invalid_ballots,
        yes_votes,
        no_votes,
        abstain_votes,
        yes_percentage: percentage(yes_votes, total_votes),
        no_percentage: percentage(no_votes, total_votes),
        abstain_percentage: percentage(abstain_votes, total_votes),
        result: if yes_votes > no_votes {
            ReferendumOutcome::Accepted
        } else {
            ReferendumOutcome::Rejected
        },
    }
}
