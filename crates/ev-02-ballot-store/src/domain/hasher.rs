//! # Canonical Ballot Hashing
//!
//! Every ballot hash is SHA-256 over a textual canonical form:
//!
//! ```text
//! first ballot:      <payload>|<election_id>|<secret>
//! later ballots:     <previous_hash>|<payload>|<election_id>|<secret>
//!
//! payload (valid):   listnum:votes entries sorted by listnum, joined by '|'
//! payload (spoiled): the literal token "invalid"
//! ```
//!
//! The `|` delimiter cannot collide: listnums and votes render as decimal
//! integers and the election id as a hyphenated UUID. Equal logical inputs
//! therefore produce equal digests across implementations.

use ev_01_secrets::BallotSecret;
use sha2::{Digest, Sha256};
use shared_types::{BallotHash, ElectionId, VoteEntry};

/// Payload token for spoiled ballots.
const INVALID_TOKEN: &str = "invalid";

/// Render the canonical string that gets hashed.
///
/// Exposed separately so the integrity verifier and tests can inspect the
/// exact pre-image layout.
pub fn canonical_ballot_string(
    election_id: &ElectionId,
    vote_decision: &[VoteEntry],
    valid: bool,
    previous_hash: Option<&str>,
    secret: &BallotSecret,
) -> String {
    let payload = if valid {
        let mut entries: Vec<VoteEntry> = vote_decision.to_vec();
        entries.sort_by_key(|e| e.listnum);
        entries
            .iter()
            .map(|e| format!("{}:{}", e.listnum, e.votes))
            .collect::<Vec<_>>()
            .join("|")
    } else {
        INVALID_TOKEN.to_string()
    };

    match previous_hash {
        Some(prev) if !prev.is_empty() => {
            format!("{}|{}|{}|{}", prev, payload, election_id, secret.expose())
        }
        _ => format!("{}|{}|{}", payload, election_id, secret.expose()),
    }
}

/// Compute the keyed ballot hash: lowercase-hex SHA-256 of the canonical
/// string.
pub fn hash_ballot(
    election_id: &ElectionId,
    vote_decision: &[VoteEntry],
    valid: bool,
    previous_hash: Option<&str>,
    secret: &BallotSecret,
) -> BallotHash {
    let canonical =
        canonical_ballot_string(election_id, vote_decision, valid, previous_hash, secret);
    let digest = Sha256::digest(canonical.as_bytes());
    hex::encode(digest)
}
