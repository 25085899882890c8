//! # Chain Verification Walk
//!
//! Walks one election's ballots in serial order, re-hashing each from its
//! raw vote rows and checking the stored chain pointers.

use crate::error::VerifyError;
use crate::report::{IntegrityIssue, IntegrityReport, IssueKind, SweepReport};
use ev_01_secrets::{SecretProvider, BALLOT_SECRET};
use ev_02_ballot_store::hash_ballot;
use shared_types::{BallotRepository, ElectionId, ElectionRepository, VoteEntry};
use std::sync::Arc;

/// Verifies per-election hash chains against the vote rows.
pub struct IntegrityVerifier<S>
where
    S: ElectionRepository + BallotRepository,
{
    store: Arc<S>,
    secrets: Arc<dyn SecretProvider>,
}

impl<S> IntegrityVerifier<S>
where
    S: ElectionRepository + BallotRepository,
{
    pub fn new(store: Arc<S>, secrets: Arc<dyn SecretProvider>) -> Self {
        Self { store, secrets }
    }

    /// Verify one election's chain.
    ///
    /// Findings never abort the walk; every ballot is examined and all
    /// findings are returned together.
    pub fn verify_election(&self, election_id: &ElectionId) -> Result<IntegrityReport, VerifyError> {
        self.store
            .election(election_id)
            .map_err(VerifyError::Storage)?
            .ok_or(VerifyError::ElectionNotFound)?;

        let secret = self.secrets.read_secret(BALLOT_SECRET)?;
        let ballots = self
            .store
            .ballots_ordered(election_id)
            .map_err(VerifyError::Storage)?;

        let mut errors = Vec::new();
        let mut verified = 0u64;
        let mut previous: Option<String> = None;

        for (index, ballot) in ballots.iter().enumerate() {
            let findings_before = errors.len();

            let vote_decision: Vec<VoteEntry> = self
                .store
                .votes_for_ballot(&ballot.id)
                .map_err(VerifyError::Storage)?
                .iter()
                .map(|row| VoteEntry {
                    listnum: row.listnum,
                    votes: row.votes,
                })
                .collect();

            // Re-hash check: recompute from raw rows and the predecessor's
            // stored hash, so a single altered ballot produces a single
            // finding instead of cascading down the chain.
            let expected_hash = hash_ballot(
                election_id,
                &vote_decision,
                ballot.valid,
                previous.as_deref(),
                &secret,
            );
            if expected_hash != ballot.ballot_hash {
                errors.push(IntegrityIssue {
                    kind: IssueKind::HashMismatch,
                    serial_id: ballot.serial_id,
                    expected: Some(expected_hash),
                    actual: Some(ballot.ballot_hash.clone()),
                    message: format!(
                        "ballot {} does not re-hash from its vote rows",
                        ballot.serial_id
                    ),
                });
            }

            // Link check against the stored predecessor hash.
            if index == 0 {
                if let Some(claimed) = &ballot.previous_ballot_hash {
                    errors.push(IntegrityIssue {
                        kind: IssueKind::InvalidGenesis,
                        serial_id: ballot.serial_id,
                        expected: None,
                        actual: Some(claimed.clone()),
                        message: "first ballot claims a predecessor".into(),
                    });
                }
            } else if ballot.previous_ballot_hash != previous {
                errors.push(IntegrityIssue {
                    kind: IssueKind::ChainBroken,
                    serial_id: ballot.serial_id,
                    expected: previous.clone(),
                    actual: ballot.previous_ballot_hash.clone(),
                    message: format!(
                        "ballot {} does not link to its predecessor",
                        ballot.serial_id
                    ),
                });
            }

            if errors.len() == findings_before {
                verified += 1;
            }

            // The stored hash is the reference for the next link check.
            previous = Some(ballot.ballot_hash.clone());
        }

        let report = IntegrityReport {
            election_id: *election_id,
            total: ballots.len() as u64,
            verified,
            errors,
        };
        if report.is_clean() {
            tracing::info!(
                "[ev-03] election {}: {} ballots verified",
                election_id,
                report.total
            );
        } else {
            tracing::warn!(
                "[ev-03] election {}: {} findings in {} ballots",
                election_id,
                report.errors.len(),
                report.total
            );
        }
        Ok(report)
    }

    /// Verify every registered election and aggregate.
    pub fn verify_all(&self) -> Result<SweepReport, VerifyError> {
        let mut election_ids = self
            .store
            .election_ids()
            .map_err(VerifyError::Storage)?;
        election_ids.sort();

        let mut reports = Vec::with_capacity(election_ids.len());
        for election_id in &election_ids {
            reports.push(self.verify_election(election_id)?);
        }
        Ok(SweepReport::from_reports(reports))
    }
}
