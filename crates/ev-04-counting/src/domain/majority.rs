//! # Majority Counting
//!
//! `highest_votes_simple` and `highest_votes_absolute`: the top
//! `seats_to_fill` candidates by vote count win. The absolute variant
//! additionally requires every elected candidate to clear more than half of
//! the valid ballots; seats whose candidate misses the threshold stay
//! unfilled.
//!
//! ## Boundary ties
//!
//! When the vote count at the last seat equals the count just below it, the
//! seat cannot be assigned deterministically. All candidates carrying that
//! count are flagged `is_tie` and none of them is elected; seats above the
//! boundary stay assigned.

use crate::domain::result_data::{describe_tie, CandidateCount, CandidateResult};
use crate::domain::tally::{percentage, ElectionTally};
use shared_types::{Candidate, CountingMethod, Election};

/// Count a majority election.
///
/// `absolute` selects the `highest_votes_absolute` behaviour.
pub fn count_highest_votes(
    election: &Election,
    candidates: &[Candidate],
    tally: &ElectionTally,
    absolute: bool,
) -> CandidateCount {
    let ranked = tally.ranked(candidates);
    let total_votes = tally.total_votes();
    let seats = election.seats_to_fill as usize;

    // Vote count shared across the decisive boundary, if any.
    let tied_votes = match (ranked.len() > seats, seats > 0) {
        (true, true) if ranked[seats - 1].1 == ranked[seats].1 => Some(ranked[seats - 1].1),
        _ => None,
    };

    let mut all_candidates = Vec::with_capacity(ranked.len());
    let mut contenders: Vec<&Candidate> = Vec::new();
    let mut majority_not_reached = false;

    for (position, &(candidate, votes)) in ranked.iter().enumerate() {
        let is_tie = tied_votes == Some(votes);
        let mut is_elected = position < seats && !is_tie;

        // Absolute majority: strictly more than half of the valid ballots.
        if is_elected && absolute && 2 * votes <= tally.valid_ballots {
            is_elected = false;
            majority_not_reached = true;
        }

        if is_tie {
            contenders.push(candidate);
        }
        all_candidates.push(CandidateResult {
            listnum: candidate.listnum,
            firstname: candidate.firstname.clone(),
            lastname: candidate.lastname.clone(),
            votes,
            percentage: percentage(votes, total_votes),
            is_elected,
            is_tie,
        });
    }

    contenders.sort_by_key(|c| c.listnum);
    let tie_info = (!contenders.is_empty()).then(|| describe_tie(&contenders));

    CandidateCount {
        algorithm: if absolute {
            CountingMethod::HighestVotesAbsolute
        } else {
            CountingMethod::HighestVotesSimple
        },
        total_votes,
        valid_ballots: tally.valid_ballots,
        invalid_ballots: tally.invalid_ballots,
        ties_detected: !contenders.is_empty(),
        tie_info,
        all_candidates,
        allocation: None,
        majority_not_reached,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::ElectionType;
    use uuid::Uuid;

    fn election(seats: u32) -> Election {
        Election {
            id: Uuid::new_v4(),
            name: "board".into(),
            election_type: ElectionType::MajorityVote,
            counting_method: Some(CountingMethod::HighestVotesSimple),
            seats_to_fill: seats,
            votes_per_ballot: 1,
            max_cumulative_votes: 0,
            start: 0,
            end: 100,
            test_election: false,
        }
    }

    fn candidates(n: u32) -> Vec<Candidate> {
        (1..=n)
            .map(|listnum| Candidate {
                id: Uuid::new_v4(),
                election_id: Uuid::nil(),
                listnum,
                firstname: format!("First{listnum}"),
                lastname: format!("Last{listnum}"),
            })
            .collect()
    }

    fn tally(valid: u64, votes: &[(u32, u32)]) -> ElectionTally {
        let mut tally = ElectionTally::new(valid, 0);
        for &(listnum, v) in votes {
            tally.add_votes(listnum, v);
        }
        tally
    }

    fn by_listnum(count: &CandidateCount, listnum: u32) -> &CandidateResult {
        count
            .all_candidates
            .iter()
            .find(|c| c.listnum == listnum)
            .unwrap()
    }

    #[test]
    fn test_simple_plurality_elects_top_seats() {
        let count = count_highest_votes(
            &election(2),
            &candidates(3),
            &tally(10, &[(1, 5), (2, 3), (3, 2)]),
            false,
        );

        assert!(by_listnum(&count, 1).is_elected);
        assert!(by_listnum(&count, 2).is_elected);
        assert!(!by_listnum(&count, 3).is_elected);
        assert!(!count.ties_detected);
        assert_eq!(by_listnum(&count, 1).percentage, 50.0);
    }

    #[test]
    fn test_boundary_tie_blocks_the_seat() {
        // Seat 2 contested between listnums 2 and 3 at 3 votes each.
        let count = count_highest_votes(
            &election(2),
            &candidates(3),
            &tally(11, &[(1, 5), (2, 3), (3, 3)]),
            false,
        );

        assert!(count.ties_detected);
        assert!(by_listnum(&count, 1).is_elected);
        for listnum in [2, 3] {
            assert!(by_listnum(&count, listnum).is_tie);
            assert!(!by_listnum(&count, listnum).is_elected);
        }
        let info = count.tie_info.unwrap();
        assert!(info.contains("list 2"));
        assert!(info.contains("list 3"));
    }

    #[test]
    fn test_three_way_tie_straddling_boundary() {
        let count = count_highest_votes(
            &election(2),
            &candidates(4),
            &tally(18, &[(1, 5), (2, 5), (3, 5), (4, 3)]),
            false,
        );

        // All three at 5 votes contend the two seats; none is assigned.
        for listnum in [1, 2, 3] {
            assert!(by_listnum(&count, listnum).is_tie);
            assert!(!by_listnum(&count, listnum).is_elected);
        }
        assert!(!by_listnum(&count, 4).is_tie);
    }

    #[test]
    fn test_absolute_majority_threshold() {
        // 60 of 100 valid ballots: above half, elected.
        let count = count_highest_votes(
            &election(1),
            &candidates(2),
            &tally(100, &[(1, 60), (2, 40)]),
            true,
        );
        assert!(by_listnum(&count, 1).is_elected);
        assert!(!count.majority_not_reached);
    }

    #[test]
    fn test_exactly_half_is_not_a_majority() {
        let count = count_highest_votes(
            &election(1),
            &candidates(2),
            &tally(100, &[(1, 50), (2, 30)]),
            true,
        );
        assert!(!by_listnum(&count, 1).is_elected);
        assert!(count.majority_not_reached);
    }

    #[test]
    fn test_majority_tie_scenario() {
        // 100 valid ballots, votes 50/25/25, two seats, absolute majority:
        // candidate 1 misses the strict majority, candidates 2 and 3 tie for
        // the second seat.
        let count = count_highest_votes(
            &election(2),
            &candidates(3),
            &tally(100, &[(1, 50), (2, 25), (3, 25)]),
            true,
        );

        assert!(count.majority_not_reached);
        assert!(!by_listnum(&count, 1).is_elected);
        assert!(!by_listnum(&count, 1).is_tie);
        assert!(count.ties_detected);
        for listnum in [2, 3] {
            assert!(by_listnum(&count, listnum).is_tie);
            assert!(!by_listnum(&count, listnum).is_elected);
        }
        let info = count.tie_info.unwrap();
        assert!(info.contains("First2"));
        assert!(info.contains("First3"));
    }

    #[test]
    fn test_fewer_candidates_than_seats() {
        let count = count_highest_votes(
            &election(5),
            &candidates(2),
            &tally(3, &[(1, 2), (2, 1)]),
            false,
        );
        assert!(count.all_candidates.iter().all(|c| c.is_elected));
        assert!(!count.ties_detected);
    }
}
