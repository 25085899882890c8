//! # Shared Store
//!
//! The reference storage adapter for the BallotChain workspace.
//!
//! ## Architecture
//!
//! [`InMemoryElectionStore`] keeps the whole election state behind one
//! `parking_lot::RwLock` and implements all three repository ports from
//! `shared-types`. Multi-row operations (`commit_cast`,
//! `clear_election_data`, `mark_final`) run under a single write guard, which
//! gives them the all-or-nothing semantics a SQL adapter would get from a
//! serialisable transaction.
//!
//! ## Durability
//!
//! With a snapshot path configured, every committed mutation is persisted as
//! a JSON snapshot (write to temp file, fsync, atomic rename). Good enough
//! for deployments without a database server; not a replication story.

pub mod memory;
pub mod snapshot;

pub use memory::InMemoryElectionStore;
pub use snapshot::Snapshot;
