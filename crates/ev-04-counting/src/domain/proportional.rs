//! # Proportional Counting
//!
//! Sainte-Laguë (highest averages with divisors 1, 3, 5, ...) and
//! Hare-Niemeyer (largest remainder). Both run on integer arithmetic only;
//! quotients and remainders are compared by cross-multiplication in `u128`
//! so no rounding can reorder an allocation.
//!
//! ## Ties
//!
//! Only the decisive (last) seat can produce an unresolvable tie. All of its
//! contenders are flagged `is_tie`; the seat itself still goes to the
//! contender with the lowest listnum so repeated counts stay deterministic.

use crate::domain::result_data::{
    describe_tie, CandidateCount, CandidateResult, SeatAllocation,
};
use crate::domain::tally::{percentage, ElectionTally};
use shared_types::{Candidate, CountingMethod, Election};
use std::collections::BTreeMap;

/// Compare two Sainte-Laguë quotients `votes / (2 * seats + 1)` without
/// division: `a_votes / a_div > b_votes / b_div` iff
/// `a_votes * b_div > b_votes * a_div`.
fn quotient_cmp(a_votes: u64, a_seats: u32, b_votes: u64, b_seats: u32) -> std::cmp::Ordering {
    let lhs = a_votes as u128 * (2 * b_seats as u128 + 1);
    let rhs = b_votes as u128 * (2 * a_seats as u128 + 1);
    lhs.cmp(&rhs)
}

/// Count under the Sainte-Laguë highest-averages method.
pub fn count_sainte_lague(
    election: &Election,
    candidates: &[Candidate],
    tally: &ElectionTally,
) -> CandidateCount {
    let total_votes = tally.total_votes();
    let seats_to_fill = election.seats_to_fill;

    let mut seats: BTreeMap<u32, u32> = candidates.iter().map(|c| (c.listnum, 0)).collect();
    let mut contenders: Vec<&Candidate> = Vec::new();

    // No votes, no quotients: leave every seat unassigned.
    if total_votes > 0 && !candidates.is_empty() {
        for round in 0..seats_to_fill {
            let winner = candidates
                .iter()
                .max_by(|a, b| {
                    quotient_cmp(
                        tally.votes_for(a.listnum),
                        seats[&a.listnum],
                        tally.votes_for(b.listnum),
                        seats[&b.listnum],
                    )
                    // Prefer the lower listnum on equal quotients.
                    .then(b.listnum.cmp(&a.listnum))
                })
                .expect("candidate list is non-empty when votes exist");

            if round + 1 == seats_to_fill {
                // The decisive seat: every list matching the winning
                // quotient contends it.
                contenders = candidates
                    .iter()
                    .filter(|c| {
                        quotient_cmp(
                            tally.votes_for(c.listnum),
                            seats[&c.listnum],
                            tally.votes_for(winner.listnum),
                            seats[&winner.listnum],
                        )
                        .is_eq()
                    })
                    .collect();
            }
            *seats.get_mut(&winner.listnum).expect("winner is a known list") += 1;
        }
    }

    if contenders.len() < 2 {
        contenders.clear();
    }
    build_proportional_count(
        CountingMethod::SainteLague,
        candidates,
        tally,
        total_votes,
        &seats,
        contenders,
    )
}

/// Count under the Hare-Niemeyer largest-remainder method.
///
/// Each list's base allocation is `votes * seats / total` rounded down; the
/// leftover seats go to the largest remainders `votes * seats mod total`.
pub fn count_hare_niemeyer(
    election: &Election,
    candidates: &[Candidate],
    tally: &ElectionTally,
) -> CandidateCount {
    let total_votes = tally.total_votes();
    let seats_to_fill = election.seats_to_fill;

    let mut seats: BTreeMap<u32, u32> = candidates.iter().map(|c| (c.listnum, 0)).collect();
    let mut contenders: Vec<&Candidate> = Vec::new();

    if total_votes > 0 {
        let mut assigned = 0u32;
        // Remainders share the denominator `total_votes`, so the numerators
        // compare directly.
        let mut remainders: Vec<(&Candidate, u128)> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let product = tally.votes_for(candidate.listnum) as u128 * seats_to_fill as u128;
            let base = (product / total_votes as u128) as u32;
            *seats.get_mut(&candidate.listnum).expect("known list") = base;
            assigned += base;
            remainders.push((candidate, product % total_votes as u128));
        }

        remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.listnum.cmp(&b.0.listnum)));
        let leftover = (seats_to_fill - assigned) as usize;
        for &(candidate, _) in remainders.iter().take(leftover) {
            *seats.get_mut(&candidate.listnum).expect("known list") += 1;
        }

        // A remainder shared across the cutoff means the last leftover seat
        // was contested.
        if leftover > 0 && leftover < remainders.len() {
            let cutoff = remainders[leftover - 1].1;
            if remainders[leftover].1 == cutoff {
                contenders = remainders
                    .iter()
                    .filter(|&&(_, r)| r == cutoff)
                    .map(|&(c, _)| c)
                    .collect();
            }
        }
    }

    build_proportional_count(
        CountingMethod::HareNiemeyer,
        candidates,
        tally,
        total_votes,
        &seats,
        contenders,
    )
}

fn build_proportional_count(
    algorithm: CountingMethod,
    candidates: &[Candidate],
    tally: &ElectionTally,
    total_votes: u64,
    seats: &BTreeMap<u32, u32>,
    mut contenders: Vec<&Candidate>,
) -> CandidateCount {
    contenders.sort_by_key(|c| c.listnum);
    let ranked = tally.ranked(candidates);

    let all_candidates = ranked
        .iter()
        .map(|&(candidate, votes)| CandidateResult {
            listnum: candidate.listnum,
            firstname: candidate.firstname.clone(),
            lastname: candidate.lastname.clone(),
            votes,
            percentage: percentage(votes, total_votes),
            is_elected: seats[&candidate.listnum] > 0,
            is_tie: contenders.iter().any(|c| c.listnum == candidate.listnum),
        })
        .collect();

    let allocation = ranked
        .iter()
        .map(|&(candidate, votes)| SeatAllocation {
            listnum: candidate.listnum,
            firstname: candidate.firstname.clone(),
            lastname: candidate.lastname.clone(),
            votes,
            seats: seats[&candidate.listnum],
        })
        .collect();

    let tie_info = (!contenders.is_empty()).then(|| describe_tie(&contenders));
    CandidateCount {
        algorithm,
        total_votes,
        valid_ballots: tally.valid_ballots,
        invalid_ballots: tally.invalid_ballots,
        ties_detected: tie_info.is_some(),
        tie_info,
        all_candidates,
        allocation: Some(allocation),
        majority_not_reached: false,
    }
}
