//! # In-Memory Election Store
//!
//! Implements all three repository ports behind a single `RwLock`. Writers
//! that touch multiple rows take one write guard for the whole mutation, so
//! readers never observe partial state.

use parking_lot::RwLock;
use shared_types::{
    Ballot, BallotId, BallotRepository, BallotVote, Candidate, CastCommit, Election,
    ElectionId, ElectionRepository, ParticipationStats, ResultRepository, StoredResult,
    StoreError, Voter, VoterId, VoterParticipation,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::snapshot::Snapshot;

#[derive(Debug, Default, Clone)]
struct StoreState {
    elections: HashMap<ElectionId, Election>,
    /// Per election, candidates keyed by listnum.
    candidates: HashMap<ElectionId, HashMap<u32, Candidate>>,
    voters: HashMap<VoterId, Voter>,
    voter_external_ids: HashSet<String>,
    /// `(voter, election) -> voted`
    participation: HashMap<(VoterId, ElectionId), bool>,
    /// Per election, ballots in serial order.
    ballots: HashMap<ElectionId, Vec<Ballot>>,
    votes: HashMap<BallotId, Vec<BallotVote>>,
    /// Per election, results in version order.
    results: HashMap<ElectionId, Vec<StoredResult>>,
}

impl StoreState {
    fn to_snapshot(&self) -> Snapshot {
        let mut candidates: Vec<Candidate> = self
            .candidates
            .values()
            .flat_map(|by_listnum| by_listnum.values().cloned())
            .collect();
        candidates.sort_by_key(|c| (c.election_id, c.listnum));

        let mut participation: Vec<VoterParticipation> = self
            .participation
            .iter()
            .map(|(&(voter_id, election_id), &voted)| VoterParticipation {
                voter_id,
                election_id,
                voted,
            })
            .collect();
        participation.sort_by_key(|p| (p.election_id, p.voter_id));

        Snapshot {
            elections: self.elections.values().cloned().collect(),
            candidates,
            voters: self.voters.values().cloned().collect(),
            participation,
            ballots: self
                .ballots
                .values()
                .flat_map(|chain| chain.iter().cloned())
                .collect(),
            votes: self.votes.values().flatten().cloned().collect(),
            results: self.results.values().flatten().cloned().collect(),
        }
    }

    fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut state = StoreState::default();
        for election in snapshot.elections {
            state.elections.insert(election.id, election);
        }
        for candidate in snapshot.candidates {
            state
                .candidates
                .entry(candidate.election_id)
                .or_default()
                .insert(candidate.listnum, candidate);
        }
        for voter in snapshot.voters {
            state.voter_external_ids.insert(voter.external_id.clone());
            state.voters.insert(voter.id, voter);
        }
        for row in snapshot.participation {
            state
                .participation
                .insert((row.voter_id, row.election_id), row.voted);
        }
        for ballot in snapshot.ballots {
            state.ballots.entry(ballot.election_id).or_default().push(ballot);
        }
        for chain in state.ballots.values_mut() {
            chain.sort_by_key(|b| b.serial_id);
        }
        for vote in snapshot.votes {
            state.votes.entry(vote.ballot_id).or_default().push(vote);
        }
        for rows in state.votes.values_mut() {
            rows.sort_by_key(|v| v.listnum);
        }
        for result in snapshot.results {
            state.results.entry(result.election_id).or_default().push(result);
        }
        for versions in state.results.values_mut() {
            versions.sort_by_key(|r| r.version);
        }
        state
    }
}

/// The reference store adapter.
///
/// Cheap to clone state out of, safe to share via `Arc`. With a snapshot
/// path set, every committed mutation is flushed to disk before the write
/// guard is released.
pub struct InMemoryElectionStore {
    state: RwLock<StoreState>,
    snapshot_path: Option<PathBuf>,
}

impl Default for InMemoryElectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryElectionStore {
    /// Create an empty, purely in-memory store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            snapshot_path: None,
        }
    }

    /// Create a store backed by a JSON snapshot file, loading existing state
    /// if the file is present.
    pub fn with_snapshot<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let state = match Snapshot::load(&path)? {
            Some(snapshot) => {
                let state = StoreState::from_snapshot(snapshot);
                tracing::info!(
                    "[shared-store] loaded snapshot from {} ({} elections, {} ballots)",
                    path.display(),
                    state.elections.len(),
                    state.ballots.values().map(Vec::len).sum::<usize>(),
                );
                state
            }
            None => {
                tracing::info!("[shared-store] no snapshot at {}", path.display());
                StoreState::default()
            }
        };
        Ok(Self {
            state: RwLock::new(state),
            snapshot_path: Some(path),
        })
    }

    /// Run a mutation and flush it. With a snapshot path set, the mutation
    /// is staged on a copy and swapped in only after the file write
    /// succeeds, so a failed flush leaves neither memory nor disk changed.
    fn write_through<F>(&self, mutate: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut StoreState) -> Result<(), StoreError>,
    {
        let mut state = self.state.write();
        match &self.snapshot_path {
            None => mutate(&mut state),
            Some(path) => {
                let mut staged = (*state).clone();
                mutate(&mut staged)?;
                staged.to_snapshot().save(path)?;
                *state = staged;
                Ok(())
            }
        }
    }
}

impl ElectionRepository for InMemoryElectionStore {
    fn insert_election(&self, election: Election) -> Result<(), StoreError> {
        if election.seats_to_fill < 1 {
            return Err(StoreError::invalid("seats_to_fill must be >= 1"));
        }
        if election.votes_per_ballot < 1 {
            return Err(StoreError::invalid("votes_per_ballot must be >= 1"));
        }
        if election.end <= election.start {
            return Err(StoreError::invalid("election end must be after start"));
        }

        self.write_through(|state| {
            if state.elections.contains_key(&election.id) {
                return Err(StoreError::conflict(format!(
                    "election {} already registered",
                    election.id
                )));
            }
            state.elections.insert(election.id, election);
            Ok(())
        })
    }

    fn election(&self, id: &ElectionId) -> Result<Option<Election>, StoreError> {
        Ok(self.state.read().elections.get(id).cloned())
    }

    fn election_ids(&self) -> Result<Vec<ElectionId>, StoreError> {
        Ok(self.state.read().elections.keys().copied().collect())
    }

    fn insert_candidate(&self, candidate: Candidate) -> Result<(), StoreError> {
        if candidate.listnum < 1 {
            return Err(StoreError::invalid("listnum must be >= 1"));
        }

        self.write_through(|state| {
            if !state.elections.contains_key(&candidate.election_id) {
                return Err(StoreError::NotFound { what: "election" });
            }
            let by_listnum = state.candidates.entry(candidate.election_id).or_default();
            if by_listnum.contains_key(&candidate.listnum) {
                return Err(StoreError::conflict(format!(
                    "listnum {} already taken in election {}",
                    candidate.listnum, candidate.election_id
                )));
            }
            by_listnum.insert(candidate.listnum, candidate);
            Ok(())
        })
    }

    fn candidates(&self, election_id: &ElectionId) -> Result<Vec<Candidate>, StoreError> {
        let state = self.state.read();
        let mut candidates: Vec<Candidate> = state
            .candidates
            .get(election_id)
            .map(|by_listnum| by_listnum.values().cloned().collect())
            .unwrap_or_default();
        candidates.sort_by_key(|c| c.listnum);
        Ok(candidates)
    }

    fn insert_voter(&self, voter: Voter) -> Result<(), StoreError> {
        self.write_through(|state| {
            if state.voters.contains_key(&voter.id) {
                return Err(StoreError::conflict(format!(
                    "voter {} already registered",
                    voter.id
                )));
            }
            if !state.voter_external_ids.insert(voter.external_id.clone()) {
                return Err(StoreError::conflict(format!(
                    "external id '{}' already registered",
                    voter.external_id
                )));
            }
            state.voters.insert(voter.id, voter);
            Ok(())
        })
    }

    fn voter(&self, id: &VoterId) -> Result<Option<Voter>, StoreError> {
        Ok(self.state.read().voters.get(id).cloned())
    }

    fn register_participant(
        &self,
        voter_id: &VoterId,
        election_id: &ElectionId,
    ) -> Result<(), StoreError> {
        self.write_through(|state| {
            if !state.voters.contains_key(voter_id) {
                return Err(StoreError::NotFound { what: "voter" });
            }
            if !state.elections.contains_key(election_id) {
                return Err(StoreError::NotFound { what: "election" });
            }
            state
                .participation
                .entry((*voter_id, *election_id))
                .or_insert(false);
            Ok(())
        })
    }

    fn participation(
        &self,
        voter_id: &VoterId,
        election_id: &ElectionId,
    ) -> Result<Option<VoterParticipation>, StoreError> {
        Ok(self
            .state
            .read()
            .participation
            .get(&(*voter_id, *election_id))
            .map(|&voted| VoterParticipation {
                voter_id: *voter_id,
                election_id: *election_id,
                voted,
            }))
    }

    fn participation_stats(
        &self,
        election_id: &ElectionId,
    ) -> Result<ParticipationStats, StoreError> {
        let state = self.state.read();
        let mut stats = ParticipationStats {
            eligible: 0,
            voted: 0,
        };
        for (&(_, eid), &voted) in &state.participation {
            if eid == *election_id {
                stats.eligible += 1;
                if voted {
                    stats.voted += 1;
                }
            }
        }
        Ok(stats)
    }
}

impl BallotRepository for InMemoryElectionStore {
    fn last_ballot(&self, election_id: &ElectionId) -> Result<Option<Ballot>, StoreError> {
        Ok(self
            .state
            .read()
            .ballots
            .get(election_id)
            .and_then(|chain| chain.last().cloned()))
    }

    fn ballots_ordered(&self, election_id: &ElectionId) -> Result<Vec<Ballot>, StoreError> {
        Ok(self
            .state
            .read()
            .ballots
            .get(election_id)
            .cloned()
            .unwrap_or_default())
    }

    fn votes_for_ballot(&self, ballot_id: &BallotId) -> Result<Vec<BallotVote>, StoreError> {
        Ok(self
            .state
            .read()
            .votes
            .get(ballot_id)
            .cloned()
            .unwrap_or_default())
    }

    fn ballot_counts(&self, election_id: &ElectionId) -> Result<(u64, u64), StoreError> {
        let state = self.state.read();
        let mut valid = 0;
        let mut invalid = 0;
        if let Some(chain) = state.ballots.get(election_id) {
            for ballot in chain {
                if ballot.valid {
                    valid += 1;
                } else {
                    invalid += 1;
                }
            }
        }
        Ok((valid, invalid))
    }

    fn commit_cast(&self, commit: CastCommit) -> Result<(), StoreError> {
        self.write_through(|state| {
            let election_id = commit.ballot.election_id;

            // Lost-race detection: the flag must not already be set. The row
            // is upserted, so unregistered participation is created on first
            // cast.
            let key = (commit.voter_id, election_id);
            if state.participation.get(&key) == Some(&true) {
                return Err(StoreError::conflict(format!(
                    "voter {} already voted in election {}",
                    commit.voter_id, election_id
                )));
            }

            // Chain tip must not have moved since the caller read it.
            let tip_serial = state
                .ballots
                .get(&election_id)
                .and_then(|chain| chain.last())
                .map(|tip| tip.serial_id);
            if tip_serial != commit.expected_previous_serial {
                return Err(StoreError::conflict(format!(
                    "chain tip moved: expected {:?}, found {:?}",
                    commit.expected_previous_serial, tip_serial
                )));
            }

            let expected_serial = tip_serial.unwrap_or(0) + 1;
            if commit.ballot.serial_id != expected_serial {
                return Err(StoreError::conflict(format!(
                    "serial gap: ballot carries {}, next is {}",
                    commit.ballot.serial_id, expected_serial
                )));
            }

            let ballot_id = commit.ballot.id;
            state
                .ballots
                .entry(election_id)
                .or_default()
                .push(commit.ballot);
            if !commit.votes.is_empty() {
                let mut rows = commit.votes;
                rows.sort_by_key(|v| v.listnum);
                state.votes.insert(ballot_id, rows);
            }
            state.participation.insert(key, true);
            Ok(())
        })
    }

    fn clear_election_data(&self, election_id: &ElectionId) -> Result<(), StoreError> {
        self.write_through(|state| {
            state.results.remove(election_id);
            if let Some(chain) = state.ballots.remove(election_id) {
                for ballot in &chain {
                    state.votes.remove(&ballot.id);
                }
                tracing::info!(
                    "[shared-store] reset election {}: {} ballots dropped",
                    election_id,
                    chain.len()
                );
            }
            for ((_, eid), voted) in state.participation.iter_mut() {
                if eid == election_id {
                    *voted = false;
                }
            }
            Ok(())
        })
    }
}

impl ResultRepository for InMemoryElectionStore {
    fn insert_result(&self, result: StoredResult) -> Result<(), StoreError> {
        self.write_through(|state| {
            let versions = state.results.entry(result.election_id).or_default();

            if versions.iter().any(|r| r.is_final) {
                return Err(StoreError::conflict(format!(
                    "election {} already has a final result",
                    result.election_id
                )));
            }
            let next = versions.last().map(|r| r.version).unwrap_or(0) + 1;
            if result.version != next {
                return Err(StoreError::conflict(format!(
                    "non-contiguous result version {}, next is {}",
                    result.version, next
                )));
            }

            versions.push(result);
            Ok(())
        })
    }

    fn result(
        &self,
        election_id: &ElectionId,
        version: u32,
    ) -> Result<Option<StoredResult>, StoreError> {
        Ok(self
            .state
            .read()
            .results
            .get(election_id)
            .and_then(|versions| versions.iter().find(|r| r.version == version).cloned()))
    }

    fn latest_result(&self, election_id: &ElectionId) -> Result<Option<StoredResult>, StoreError> {
        Ok(self
            .state
            .read()
            .results
            .get(election_id)
            .and_then(|versions| versions.last().cloned()))
    }

    fn max_version(&self, election_id: &ElectionId) -> Result<u32, StoreError> {
        Ok(self
            .state
            .read()
            .results
            .get(election_id)
            .and_then(|versions| versions.last())
            .map(|r| r.version)
            .unwrap_or(0))
    }

    fn final_result(&self, election_id: &ElectionId) -> Result<Option<StoredResult>, StoreError> {
        Ok(self
            .state
            .read()
            .results
            .get(election_id)
            .and_then(|versions| versions.iter().find(|r| r.is_final).cloned()))
    }

    fn mark_final(&self, election_id: &ElectionId, version: u32) -> Result<(), StoreError> {
        self.write_through(|state| {
            let versions = state
                .results
                .get_mut(election_id)
                .ok_or(StoreError::NotFound { what: "result" })?;

            if versions.iter().any(|r| r.is_final) {
                return Err(StoreError::conflict(format!(
                    "election {election_id} already has a final result"
                )));
            }
            let record = versions
                .iter_mut()
                .find(|r| r.version == version)
                .ok_or(StoreError::NotFound { what: "result" })?;
            record.is_final = true;
            Ok(())
        })
    }
}
