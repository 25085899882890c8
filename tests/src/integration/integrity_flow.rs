//! # Integrity Flow
//!
//! Casts real ballots through the ballot store service and runs the
//! verifier over them, including a tampered replica of the chain.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::World;
    use ev_01_secrets::{StaticSecretProvider, BALLOT_SECRET};
    use ev_02_ballot_store::BallotStoreApi;
    use ev_03_integrity::{IntegrityVerifier, IssueKind};
    use shared_store::InMemoryElectionStore;
    use shared_types::{
        BallotInput, BallotRepository, BallotVote, CastCommit, CountingMethod, ElectionId,
        ElectionRepository, VoteEntry, Voter,
    };
    use std::sync::Arc;
    use uuid::Uuid;

    fn cast(world: &World, election_id: ElectionId, listnum: u32) {
        let voter = world.add_voter();
        world
            .ballots
            .cast(
                voter,
                BallotInput {
                    election_id,
                    valid: true,
                    vote_decision: vec![VoteEntry { listnum, votes: 1 }],
                },
            )
            .unwrap();
    }

    fn verifier(world: &World) -> IntegrityVerifier<InMemoryElectionStore> {
        IntegrityVerifier::new(world.store.clone(), world.secrets.clone())
    }

    #[test]
    fn test_cast_chain_verifies_cleanly() {
        let world = World::new();
        let election_id = world.add_election(CountingMethod::HighestVotesSimple, 1, 3);

        for listnum in [1, 2, 3, 1] {
            cast(&world, election_id, listnum);
        }
        let voter = world.add_voter();
        world
            .ballots
            .cast(
                voter,
                BallotInput {
                    election_id,
                    valid: false,
                    vote_decision: vec![],
                },
            )
            .unwrap();

        let report = verifier(&world).verify_election(&election_id).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.total, 5);
        assert_eq!(report.verified, 5);
    }

    #[test]
    fn test_tampered_replica_is_flagged_at_one_serial() {
        let world = World::new();
        let election_id = world.add_election(CountingMethod::HighestVotesSimple, 1, 3);
        for listnum in [1, 2, 3, 1, 2] {
            cast(&world, election_id, listnum);
        }

        // Replay the chain into a second store, altering the vote rows of
        // serial 3 without touching its hash.
        let tampered = World::with_store(Arc::new(InMemoryElectionStore::new()));
        let election = world.store.election(&election_id).unwrap().unwrap();
        tampered.store.insert_election(election).unwrap();
        for ballot in world.store.ballots_ordered(&election_id).unwrap() {
            let voter = Voter {
                id: Uuid::new_v4(),
                external_id: Uuid::new_v4().to_string(),
            };
            tampered.store.insert_voter(voter.clone()).unwrap();

            let votes: Vec<BallotVote> = world
                .store
                .votes_for_ballot(&ballot.id)
                .unwrap()
                .into_iter()
                .map(|mut row| {
                    if ballot.serial_id == 3 {
                        row.votes += 4;
                    }
                    row
                })
                .collect();
            let expected_previous_serial = (ballot.serial_id > 1).then(|| ballot.serial_id - 1);
            tampered
                .store
                .commit_cast(CastCommit {
                    voter_id: voter.id,
                    ballot,
                    votes,
                    expected_previous_serial,
                })
                .unwrap();
        }

        let report = verifier(&tampered).verify_election(&election_id).unwrap();
        assert_eq!(report.total, 5);
        assert_eq!(report.verified, 4);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, IssueKind::HashMismatch);
        assert_eq!(report.errors[0].serial_id, 3);
    }

    #[test]
    fn test_wrong_secret_fails_every_ballot() {
        let world = World::new();
        let election_id = world.add_election(CountingMethod::HighestVotesSimple, 1, 3);
        for listnum in [1, 2] {
            cast(&world, election_id, listnum);
        }

        let wrong = IntegrityVerifier::new(
            world.store.clone(),
            Arc::new(StaticSecretProvider::single(BALLOT_SECRET, "not-the-key")),
        );
        let report = wrong.verify_election(&election_id).unwrap();
        assert_eq!(report.verified, 0);
        assert!(report
            .errors
            .iter()
            .all(|e| e.kind == IssueKind::HashMismatch));
    }

    #[test]
    fn test_sweep_covers_all_elections() {
        let world = World::new();
        let first = world.add_election(CountingMethod::HighestVotesSimple, 1, 3);
        let second = world.add_election(CountingMethod::YesNoReferendum, 1, 3);
        cast(&world, first, 1);
        cast(&world, first, 2);
        cast(&world, second, 1);

        let sweep = verifier(&world).verify_all().unwrap();
        assert_eq!(sweep.elections.len(), 2);
        assert_eq!(sweep.total_ballots, 3);
        assert_eq!(sweep.total_verified, 3);
        assert_eq!(sweep.total_errors, 0);
    }
}
