//! # Counting Service
//!
//! Orchestrates counting over the storage ports: end-of-window check, tally
//! aggregation over valid ballots, algorithm dispatch, and the versioned
//! result records with terminal finalisation.

use crate::domain::errors::CountError;
use crate::domain::majority::count_highest_votes;
use crate::domain::proportional::{count_hare_niemeyer, count_sainte_lague};
use crate::domain::referendum::count_referendum;
use crate::domain::result_data::ResultData;
use crate::domain::tally::ElectionTally;
use shared_types::{
    BallotRepository, CountingMethod, Election, ElectionId, ElectionRepository, ResultRepository,
    StoreError, StoredResult, TimeSource,
};
use std::sync::Arc;

/// Application service for counting, result retrieval, and finalisation.
pub struct CountingService<S>
where
    S: ElectionRepository + BallotRepository + ResultRepository,
{
    store: Arc<S>,
    time: Arc<dyn TimeSource>,
}

impl<S> CountingService<S>
where
    S: ElectionRepository + BallotRepository + ResultRepository,
{
    pub fn new(store: Arc<S>, time: Arc<dyn TimeSource>) -> Self {
        Self { store, time }
    }

    /// Count the election and store the outcome as the next result version.
    ///
    /// Re-counting is allowed and produces a new version; once a final
    /// result exists counting fails with `AlreadyFinalized`.
    pub fn count(
        &self,
        election_id: &ElectionId,
        counted_by: &str,
    ) -> Result<StoredResult, CountError> {
        let election = self
            .store
            .election(election_id)
            .map_err(CountError::Storage)?
            .ok_or(CountError::ElectionNotFound)?;

        let now = self.time.now();
        if !election.has_ended(now) {
            return Err(CountError::ElectionNotEnded {
                now,
                end: election.end,
            });
        }
        if self
            .store
            .final_result(election_id)
            .map_err(CountError::Storage)?
            .is_some()
        {
            return Err(CountError::AlreadyFinalized);
        }
        let method = election
            .counting_method
            .ok_or(CountError::MethodNotConfigured)?;

        let tally = self.tally(election_id)?;
        let data = self.run_algorithm(method, &election, &tally)?;
        let result_data = serde_json::to_value(&data).map_err(|e| CountError::Serialization {
            message: e.to_string(),
        })?;

        let version = self
            .store
            .max_version(election_id)
            .map_err(CountError::Storage)?
            + 1;
        let result = StoredResult {
            election_id: *election_id,
            version,
            result_data,
            counted_by: counted_by.to_string(),
            counted_at: now,
            is_final: false,
        };
        self.store
            .insert_result(result.clone())
            .map_err(CountError::Storage)?;

        tracing::info!(
            "[ev-04] election {} counted with {:?} as version {} ({} valid / {} invalid ballots)",
            election_id,
            method,
            version,
            tally.valid_ballots,
            tally.invalid_ballots
        );
        Ok(result)
    }

    /// Mark one result version as final. Terminal: afterwards no further
    /// counting or finalisation is possible.
    pub fn finalize(
        &self,
        election_id: &ElectionId,
        version: u32,
        finalized_by: &str,
    ) -> Result<StoredResult, CountError> {
        self.store
            .election(election_id)
            .map_err(CountError::Storage)?
            .ok_or(CountError::ElectionNotFound)?;

        self.store
            .mark_final(election_id, version)
            .map_err(|e| match e {
                StoreError::NotFound { .. } => CountError::ResultNotFound,
                StoreError::Conflict { .. } => CountError::AlreadyFinalized,
                other => CountError::Storage(other),
            })?;

        tracing::info!(
            "[ev-04] election {} finalized at version {} by {}",
            election_id,
            version,
            finalized_by
        );
        self.store
            .result(election_id, version)
            .map_err(CountError::Storage)?
            .ok_or(CountError::ResultNotFound)
    }

    /// Fetch one result version, or the latest when `version` is `None`.
    pub fn get_results(
        &self,
        election_id: &ElectionId,
        version: Option<u32>,
    ) -> Result<StoredResult, CountError> {
        self.store
            .election(election_id)
            .map_err(CountError::Storage)?
            .ok_or(CountError::ElectionNotFound)?;

        let result = match version {
            Some(v) => self.store.result(election_id, v),
            None => self.store.latest_result(election_id),
        }
        .map_err(CountError::Storage)?;
        result.ok_or(CountError::ResultNotFound)
    }

    /// Aggregate the vote rows of all valid ballots.
    fn tally(&self, election_id: &ElectionId) -> Result<ElectionTally, CountError> {
        let ballots = self
            .store
            .ballots_ordered(election_id)
            .map_err(CountError::Storage)?;

        let mut tally = ElectionTally::default();
        for ballot in &ballots {
            if !ballot.valid {
                tally.invalid_ballots += 1;
                continue;
            }
            tally.valid_ballots += 1;
            for row in self
                .store
                .votes_for_ballot(&ballot.id)
                .map_err(CountError::Storage)?
            {
                tally.add_votes(row.listnum, row.votes);
            }
        }
        Ok(tally)
    }

    fn run_algorithm(
        &self,
        method: CountingMethod,
        election: &Election,
        tally: &ElectionTally,
    ) -> Result<ResultData, CountError> {
        let candidates = self
            .store
            .candidates(&election.id)
            .map_err(CountError::Storage)?;

        Ok(match method {
            CountingMethod::SainteLague => {
                ResultData::Candidates(count_sainte_lague(election, &candidates, tally))
            }
            CountingMethod::HareNiemeyer => {
                ResultData::Candidates(count_hare_niemeyer(election, &candidates, tally))
            }
            CountingMethod::HighestVotesSimple => {
                ResultData::Candidates(count_highest_votes(election, &candidates, tally, false))
            }
            CountingMethod::HighestVotesAbsolute => {
                ResultData::Candidates(count_highest_votes(election, &candidates, tally, true))
            }
            CountingMethod::YesNoReferendum => ResultData::Referendum(count_referendum(tally)),
        })
    }
}
