//! Cross-subsystem choreography: casting, verification, and counting
//! running against the same store, the way the deployed system wires them.

pub mod casting_flow;
pub mod counting_flow;
pub mod integrity_flow;

#[cfg(test)]
pub(crate) mod fixtures {
    use ev_01_secrets::{SecretProvider, StaticSecretProvider, BALLOT_SECRET};
    use ev_02_ballot_store::BallotStoreService;
    use shared_store::InMemoryElectionStore;
    use shared_types::{
        Candidate, CountingMethod, Election, ElectionId, ElectionRepository, ElectionType,
        MockTimeSource, TimeSource, Voter, VoterId,
    };
    use std::sync::Arc;
    use uuid::Uuid;

    pub const SECRET_VALUE: &str = "integration-secret";

    pub struct World {
        pub store: Arc<InMemoryElectionStore>,
        pub clock: Arc<MockTimeSource>,
        pub secrets: Arc<dyn SecretProvider>,
        pub ballots: Arc<BallotStoreService<InMemoryElectionStore>>,
    }

    impl World {
        /// Wire all services onto a fresh in-memory store with the clock
        /// inside the default voting window.
        pub fn new() -> Self {
            Self::with_store(Arc::new(InMemoryElectionStore::new()))
        }

        pub fn with_store(store: Arc<InMemoryElectionStore>) -> Self {
            let clock = Arc::new(MockTimeSource::new(150));
            let secrets: Arc<dyn SecretProvider> =
                Arc::new(StaticSecretProvider::single(BALLOT_SECRET, SECRET_VALUE));
            let ballots = Arc::new(BallotStoreService::new(
                store.clone(),
                secrets.clone(),
                clock.clone() as Arc<dyn TimeSource>,
            ));
            Self {
                store,
                clock,
                secrets,
                ballots,
            }
        }

        /// Insert an election with window `[100, 200)` and `candidates`
        /// lists numbered from 1.
        pub fn add_election(&self, method: CountingMethod, seats: u32, candidates: u32) -> ElectionId {
            let election_type = match method {
                CountingMethod::YesNoReferendum => ElectionType::Referendum,
                CountingMethod::SainteLague | CountingMethod::HareNiemeyer => {
                    ElectionType::ProportionalRepresentation
                }
                _ => ElectionType::MajorityVote,
            };
            let election = Election {
                id: Uuid::new_v4(),
                name: "integration".into(),
                election_type,
                counting_method: Some(method),
                seats_to_fill: seats,
                votes_per_ballot: 3,
                max_cumulative_votes: 2,
                start: 100,
                end: 200,
                test_election: false,
            };
            let id = election.id;
            self.store.insert_election(election).unwrap();
            for listnum in 1..=candidates {
                self.store
                    .insert_candidate(Candidate {
                        id: Uuid::new_v4(),
                        election_id: id,
                        listnum,
                        firstname: format!("First{listnum}"),
                        lastname: format!("Last{listnum}"),
                    })
                    .unwrap();
            }
            id
        }

        pub fn add_voter(&self) -> VoterId {
            let voter = Voter {
                id: Uuid::new_v4(),
                external_id: Uuid::new_v4().to_string(),
            };
            let id = voter.id;
            self.store.insert_voter(voter).unwrap();
            id
        }
    }
}
