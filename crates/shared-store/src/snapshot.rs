//! # JSON Snapshot Persistence
//!
//! Flat row-oriented snapshot of the whole store, written atomically via a
//! temp file and rename so a crash mid-write never leaves a torn snapshot.

use serde::{Deserialize, Serialize};
use shared_types::{
    Ballot, BallotVote, Candidate, Election, StoredResult, StoreError, Voter, VoterParticipation,
};
use std::io::Write;
use std::path::Path;

/// Serialisable image of the full store state.
///
/// Rows only; the in-memory indexes are rebuilt on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub elections: Vec<Election>,
    pub candidates: Vec<Candidate>,
    pub voters: Vec<Voter>,
    pub participation: Vec<VoterParticipation>,
    pub ballots: Vec<Ballot>,
    pub votes: Vec<BallotVote>,
    pub results: Vec<StoredResult>,
}

impl Snapshot {
    /// Write the snapshot to `path` atomically.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                message: e.to_string(),
            })?;
        }

        let bytes = serde_json::to_vec_pretty(self).map_err(|e| StoreError::Serialization {
            message: e.to_string(),
        })?;

        // Write atomically via temp file
        let temp_path = path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(|e| StoreError::Io {
            message: e.to_string(),
        })?;
        file.write_all(&bytes).map_err(|e| StoreError::Io {
            message: e.to_string(),
        })?;
        file.sync_all().map_err(|e| StoreError::Io {
            message: e.to_string(),
        })?;
        std::fs::rename(&temp_path, path).map_err(|e| StoreError::Io {
            message: e.to_string(),
        })?;

        Ok(())
    }

    /// Load a snapshot from `path`. Returns `Ok(None)` when the file does
    /// not exist yet.
    pub fn load(path: &Path) -> Result<Option<Self>, StoreError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Io {
                    message: e.to_string(),
                })
            }
        };

        let snapshot = serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
            message: e.to_string(),
        })?;
        Ok(Some(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{CountingMethod, ElectionType};
    use uuid::Uuid;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let snapshot = Snapshot {
            elections: vec![Election {
                id: Uuid::new_v4(),
                name: "council".into(),
                election_type: ElectionType::ProportionalRepresentation,
                counting_method: Some(CountingMethod::SainteLague),
                seats_to_fill: 5,
                votes_per_ballot: 3,
                max_cumulative_votes: 2,
                start: 100,
                end: 200,
                test_election: false,
            }],
            ..Default::default()
        };

        snapshot.save(&path).unwrap();
        let loaded = Snapshot::load(&path).unwrap().unwrap();
        assert_eq!(loaded.elections.len(), 1);
        assert_eq!(loaded.elections[0].name, "council");
        assert_eq!(loaded.elections[0].seats_to_fill, 5);
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Snapshot::load(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        Snapshot::default().save(&path).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
