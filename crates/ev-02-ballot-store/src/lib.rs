//! # Ballot Store (ev-02)
//!
//! Accepts a voter's ballot and appends it to the per-election
//! tamper-evident hash chain under strict cast-once semantics.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Cast Once | At most one ballot per voter per election |
//! | 2 | Gap-Free Serials | `serial_id` is 1, 2, 3, ... per election, no gaps |
//! | 3 | Chain Linkage | Each ballot embeds its predecessor's hash; first ballot links to nothing |
//! | 4 | Keyed Hashes | Every hash mixes in the server-held ballot secret |
//! | 5 | Atomic Cast | Ballot, vote rows, and participation flag commit together or not at all |
//! | 6 | Window Enforcement | Casting only inside `[start, end)` |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Pure domain logic (canonical hashing, structural validation)
//! - `ports/` - Inbound API trait
//! - `service.rs` - Application service over the storage ports
//!
//! ## Usage
//!
//! ```ignore
//! use ev_02_ballot_store::{BallotStoreApi, BallotStoreService};
//!
//! let service = BallotStoreService::new(store, secrets, time);
//! let ballot = service.cast(voter_id, ballot_input)?;
//! ```

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::errors::{CastError, ValidationError};
pub use domain::hasher::{canonical_ballot_string, hash_ballot};
pub use domain::validator::validate_ballot;
pub use ports::inbound::{BallotStoreApi, ChainHead};
pub use service::BallotStoreService;
