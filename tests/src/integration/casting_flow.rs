//! # Casting Flow
//!
//! Concurrent casting against one election and snapshot persistence across
//! a store restart.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::World;
    use ev_02_ballot_store::{BallotStoreApi, CastError};
    use shared_store::InMemoryElectionStore;
    use shared_types::{BallotInput, BallotRepository, CountingMethod, VoteEntry};
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn input(election_id: shared_types::ElectionId, listnum: u32) -> BallotInput {
        BallotInput {
            election_id,
            valid: true,
            vote_decision: vec![VoteEntry { listnum, votes: 1 }],
        }
    }

    #[test]
    fn test_concurrent_casts_keep_the_chain_gap_free() {
        let world = World::new();
        let election_id = world.add_election(CountingMethod::HighestVotesSimple, 1, 3);

        let voters: Vec<_> = (0..8).map(|_| world.add_voter()).collect();
        let barrier = Arc::new(Barrier::new(voters.len()));

        let handles: Vec<_> = voters
            .into_iter()
            .enumerate()
            .map(|(i, voter)| {
                let service = world.ballots.clone();
                let barrier = barrier.clone();
                let ballot = input(election_id, (i as u32 % 3) + 1);
                thread::spawn(move || {
                    barrier.wait();
                    service.cast(voter, ballot)
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let ballots = world.store.ballots_ordered(&election_id).unwrap();
        assert_eq!(ballots.len(), 8);
        for (index, ballot) in ballots.iter().enumerate() {
            assert_eq!(ballot.serial_id, index as u64 + 1);
            if index == 0 {
                assert_eq!(ballot.previous_ballot_hash, None);
            } else {
                assert_eq!(
                    ballot.previous_ballot_hash.as_deref(),
                    Some(ballots[index - 1].ballot_hash.as_str())
                );
            }
        }
    }

    #[test]
    fn test_concurrent_double_vote_yields_exactly_one_ballot() {
        let world = World::new();
        let election_id = world.add_election(CountingMethod::HighestVotesSimple, 1, 3);
        let voter = world.add_voter();

        let barrier = Arc::new(Barrier::new(4));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let service = world.ballots.clone();
                let barrier = barrier.clone();
                let ballot = input(election_id, 1);
                thread::spawn(move || {
                    barrier.wait();
                    service.cast(voter, ballot)
                })
            })
            .collect();

        let mut committed = 0;
        for handle in handles {
            match handle.join().unwrap() {
                Ok(_) => committed += 1,
                Err(CastError::AlreadyVoted) => {}
                Err(e) => panic!("unexpected cast error: {e}"),
            }
        }

        assert_eq!(committed, 1);
        assert_eq!(world.store.ballots_ordered(&election_id).unwrap().len(), 1);
    }

    #[test]
    fn test_snapshot_survives_a_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let world = World::with_store(Arc::new(
            InMemoryElectionStore::with_snapshot(&path).unwrap(),
        ));
        let election_id = world.add_election(CountingMethod::HighestVotesSimple, 1, 3);
        for listnum in 1..=3 {
            let voter = world.add_voter();
            world
                .ballots
                .cast(voter, input(election_id, listnum))
                .unwrap();
        }
        // Every committed mutation is flushed, so nothing to do before the
        // "restart": reload from disk into a fresh world.
        let reloaded = World::with_store(Arc::new(
            InMemoryElectionStore::with_snapshot(&path).unwrap(),
        ));
        let ballots = reloaded.store.ballots_ordered(&election_id).unwrap();
        assert_eq!(ballots.len(), 3);

        // The chain continues where it left off.
        let voter = reloaded.add_voter();
        let next = reloaded
            .ballots
            .cast(voter, input(election_id, 1))
            .unwrap();
        assert_eq!(next.serial_id, 4);
        assert_eq!(
            next.previous_ballot_hash.as_deref(),
            Some(ballots[2].ballot_hash.as_str())
        );
    }
}
