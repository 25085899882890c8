//! # Ballot Store Service
//!
//! Orchestrates `cast` over the storage ports: window check, structural
//! validation, per-election serialisation, keyed hashing, atomic commit.
//!
//! ## Per-election serialisation
//!
//! Reading the chain tip and committing the new ballot happen under an
//! advisory mutex keyed by election id. Without it, two concurrent casts
//! could read the same tip and fork the chain. Conflicts the store still
//! reports (e.g. a second process) are retried a bounded number of times.

use crate::domain::errors::CastError;
use crate::domain::hasher::hash_ballot;
use crate::domain::validator::validate_ballot;
use crate::ports::inbound::{BallotStoreApi, ChainHead};
use ev_01_secrets::{SecretProvider, BALLOT_SECRET};
use parking_lot::Mutex;
use shared_types::{
    Ballot, BallotInput, BallotRepository, BallotVote, CastCommit, ElectionId,
    ElectionRepository, StoreError, TimeSource, VoterId,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Conflict retries before `cast` gives up with `SystemBusy`.
const MAX_CAST_RETRIES: u32 = 3;

/// Application service implementing [`BallotStoreApi`].
pub struct BallotStoreService<S>
where
    S: ElectionRepository + BallotRepository,
{
    store: Arc<S>,
    secrets: Arc<dyn SecretProvider>,
    time: Arc<dyn TimeSource>,
    /// Advisory locks keyed by election id; casts on the same election
    /// serialise here, different elections run in parallel.
    election_locks: Mutex<HashMap<ElectionId, Arc<Mutex<()>>>>,
}

impl<S> BallotStoreService<S>
where
    S: ElectionRepository + BallotRepository,
{
    pub fn new(store: Arc<S>, secrets: Arc<dyn SecretProvider>, time: Arc<dyn TimeSource>) -> Self {
        Self {
            store,
            secrets,
            time,
            election_locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, election_id: &ElectionId) -> Arc<Mutex<()>> {
        let mut locks = self.election_locks.lock();
        locks.entry(*election_id).or_default().clone()
    }

    /// One serialised cast attempt: read tip, hash, commit.
    fn try_append(
        &self,
        voter_id: VoterId,
        input: &BallotInput,
        now: u64,
    ) -> Result<Ballot, CastError> {
        let election_lock = self.lock_for(&input.election_id);
        let _guard = election_lock.lock();

        // Cast-once check inside the serialised section: a concurrent cast
        // that just committed must be seen here.
        if let Some(participation) = self
            .store
            .participation(&voter_id, &input.election_id)
            .map_err(CastError::Storage)?
        {
            if participation.voted {
                return Err(CastError::AlreadyVoted);
            }
        }

        let secret = self.secrets.read_secret(BALLOT_SECRET)?;

        let tip = self
            .store
            .last_ballot(&input.election_id)
            .map_err(CastError::Storage)?;
        let previous_hash = tip.as_ref().map(|b| b.ballot_hash.clone());
        let serial_id = tip.as_ref().map(|b| b.serial_id).unwrap_or(0) + 1;

        let ballot_hash = hash_ballot(
            &input.election_id,
            &input.vote_decision,
            input.valid,
            previous_hash.as_deref(),
            &secret,
        );

        let ballot = Ballot {
            id: Uuid::new_v4(),
            election_id: input.election_id,
            serial_id,
            valid: input.valid,
            ballot_hash,
            previous_ballot_hash: previous_hash,
            created_at: now,
        };

        let votes = if input.valid {
            input
                .vote_decision
                .iter()
                .map(|e| BallotVote {
                    ballot_id: ballot.id,
                    listnum: e.listnum,
                    votes: e.votes,
                })
                .collect()
        } else {
            Vec::new()
        };

        self.store
            .commit_cast(CastCommit {
                voter_id,
                ballot: ballot.clone(),
                votes,
                expected_previous_serial: tip.map(|b| b.serial_id),
            })
            .map_err(|e| match e {
                StoreError::Conflict { .. } => CastError::SystemBusy,
                other => CastError::Storage(other),
            })?;

        Ok(ballot)
    }
}

impl<S> BallotStoreApi for BallotStoreService<S>
where
    S: ElectionRepository + BallotRepository,
{
    fn cast(&self, voter_id: VoterId, input: BallotInput) -> Result<Ballot, CastError> {
        let election = self
            .store
            .election(&input.election_id)
            .map_err(CastError::Storage)?
            .ok_or(CastError::ElectionNotFound)?;

        let now = self.time.now();
        if !election.is_active(now) {
            return Err(CastError::ElectionNotActive {
                now,
                start: election.start,
                end: election.end,
            });
        }

        self.store
            .voter(&voter_id)
            .map_err(CastError::Storage)?
            .ok_or(CastError::VoterNotFound)?;

        let candidates = self
            .store
            .candidates(&input.election_id)
            .map_err(CastError::Storage)?;
        validate_ballot(&input, &election, &candidates)?;

        let mut attempt = 0;
        loop {
            match self.try_append(voter_id, &input, now) {
                Ok(ballot) => {
                    tracing::info!(
                        "[ev-02] ballot {} committed for election {} (valid: {})",
                        ballot.serial_id,
                        ballot.election_id,
                        ballot.valid
                    );
                    return Ok(ballot);
                }
                Err(CastError::SystemBusy) if attempt < MAX_CAST_RETRIES => {
                    attempt += 1;
                    tracing::warn!(
                        "[ev-02] cast conflict on election {}, retry {}/{}",
                        input.election_id,
                        attempt,
                        MAX_CAST_RETRIES
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn reset_test_election(&self, election_id: &ElectionId) -> Result<(), CastError> {
        let election = self
            .store
            .election(election_id)
            .map_err(CastError::Storage)?
            .ok_or(CastError::ElectionNotFound)?;

        let now = self.time.now();
        if now >= election.start && !election.test_election {
            return Err(CastError::ElectionActive);
        }

        let election_lock = self.lock_for(election_id);
        let _guard = election_lock.lock();
        self.store
            .clear_election_data(election_id)
            .map_err(CastError::Storage)?;
        // Drop the advisory-lock entry so the map does not retain one slot
        // per election for the process lifetime. A cast racing the reset
        // re-creates it, and the store's tip check still catches any
        // interleaving.
        self.election_locks.lock().remove(election_id);
        tracing::info!("[ev-02] election {} reset", election_id);
        Ok(())
    }

    fn chain_head(&self, election_id: &ElectionId) -> Result<Option<ChainHead>, CastError> {
        self.store
            .election(election_id)
            .map_err(CastError::Storage)?
            .ok_or(CastError::ElectionNotFound)?;

        Ok(self
            .store
            .last_ballot(election_id)
            .map_err(CastError::Storage)?
            .map(|b| ChainHead {
                serial_id: b.serial_id,
                ballot_hash: b.ballot_hash,
            }))
    }
}
