//! # Vote Tally
//!
//! The per-listnum sums over valid ballots, plus ballot counters. Input to
//! every counting algorithm.

use shared_types::Candidate;
use std::collections::BTreeMap;

/// Aggregated votes of one election.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElectionTally {
    /// `listnum -> total votes`, summed over valid ballots only.
    votes: BTreeMap<u32, u64>,
    pub valid_ballots: u64,
    pub invalid_ballots: u64,
}

impl ElectionTally {
    pub fn new(valid_ballots: u64, invalid_ballots: u64) -> Self {
        Self {
            votes: BTreeMap::new(),
            valid_ballots,
            invalid_ballots,
        }
    }

    /// Add one vote row to the tally.
    pub fn add_votes(&mut self, listnum: u32, votes: u32) {
        *self.votes.entry(listnum).or_insert(0) += votes as u64;
    }

    /// Total of a single list (0 when the list received no votes).
    pub fn votes_for(&self, listnum: u32) -> u64 {
        self.votes.get(&listnum).copied().unwrap_or(0)
    }

    /// Sum over all lists.
    pub fn total_votes(&self) -> u64 {
        self.votes.values().sum()
    }

    /// Candidates paired with their totals, ranked by votes descending,
    /// listnum ascending. The ranking every candidate-based algorithm
    /// starts from.
    pub fn ranked<'a>(&self, candidates: &'a [Candidate]) -> Vec<(&'a Candidate, u64)> {
        let mut ranked: Vec<(&Candidate, u64)> = candidates
            .iter()
            .map(|c| (c, self.votes_for(c.listnum)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.listnum.cmp(&b.0.listnum)));
        ranked
    }
}

/// Share of `votes` in `total`, in percent. 0.0 for an empty total.
pub fn percentage(votes: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        votes as f64 * 100.0 / total as f64
    }
}
