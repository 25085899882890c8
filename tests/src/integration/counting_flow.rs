//! # Counting Flow
//!
//! The full election lifecycle: casting during the window, verification
//! and counting after it closes, versioning, and finalisation.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::World;
    use ev_02_ballot_store::BallotStoreApi;
    use ev_03_integrity::IntegrityVerifier;
    use ev_04_counting::{CountError, CountingService};
    use shared_store::InMemoryElectionStore;
    use shared_types::{BallotInput, CountingMethod, ElectionId, TimeSource, VoteEntry};

    fn counting(world: &World) -> CountingService<InMemoryElectionStore> {
        CountingService::new(
            world.store.clone(),
            world.clock.clone() as std::sync::Arc<dyn TimeSource>,
        )
    }

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

    #[test]
    fn test_full_lifecycle_cast_verify_count_finalize() {
        let world = World::new();
        let election_id = world.add_election(CountingMethod::YesNoReferendum, 1, 3);
        let counting = counting(&world);

        // 6 yes, 4 no during the window.
        for _ in 0..6 {
            cast(&world, election_id, 1);
        }
        for _ in 0..4 {
            cast(&world, election_id, 2);
        }

        // Still inside the window: counting is refused.
        assert!(matches!(
            counting.count(&election_id, "admin"),
            Err(CountError::ElectionNotEnded { .. })
        ));

        // After the window closes no further ballot gets in.
        world.clock.set(200);
        assert!(world
            .ballots
            .cast(
                world.add_voter(),
                BallotInput {
                    election_id,
                    valid: true,
                    vote_decision: vec![VoteEntry {
                        listnum: 1,
                        votes: 1
                    }],
                },
            )
            .is_err());

        // The chain is clean before the count.
        let verifier = IntegrityVerifier::new(world.store.clone(), world.secrets.clone());
        assert!(verifier.verify_election(&election_id).unwrap().is_clean());

        let result = counting.count(&election_id, "admin").unwrap();
        assert_eq!(result.version, 1);
        assert_eq!(result.result_data["result"], "ACCEPTED");
        assert_eq!(result.result_data["yes_percentage"], 60.0);
        assert_eq!(result.result_data["no_percentage"], 40.0);

        let finalized = counting.finalize(&election_id, 1, "admin").unwrap();
        assert!(finalized.is_final);
        assert!(matches!(
            counting.count(&election_id, "admin"),
            Err(CountError::AlreadyFinalized)
        ));

        let fetched = counting.get_results(&election_id, None).unwrap();
        assert_eq!(fetched.version, 1);
        assert!(fetched.is_final);
    }

    #[test]
    fn test_recount_versions_stay_contiguous() {
        let world = World::new();
        let election_id = world.add_election(CountingMethod::SainteLague, 3, 3);
        let counting = counting(&world);

        for listnum in [1, 1, 2, 3] {
            cast(&world, election_id, listnum);
        }
        world.clock.set(250);

        for expected_version in 1..=3 {
            let result = counting.count(&election_id, "admin").unwrap();
            assert_eq!(result.version, expected_version);
        }
        assert_eq!(
            counting.get_results(&election_id, None).unwrap().version,
            3
        );
        assert_eq!(
            counting
                .get_results(&election_id, Some(2))
                .unwrap()
                .version,
            2
        );
    }

    #[test]
    fn test_spoiled_ballots_reach_the_result_as_invalid() {
        let world = World::new();
        let election_id = world.add_election(CountingMethod::HighestVotesSimple, 1, 3);
        let counting = counting(&world);

        cast(&world, election_id, 1);
        cast(&world, election_id, 2);
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

        world.clock.set(200);
        let result = counting.count(&election_id, "admin").unwrap();
        assert_eq!(result.result_data["valid_ballots"], 2);
        assert_eq!(result.result_data["invalid_ballots"], 1);
        assert_eq!(result.result_data["total_votes"], 2);
    }
}
