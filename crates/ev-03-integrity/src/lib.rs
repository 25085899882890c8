//! # Integrity Verifier (ev-03)
//!
//! Re-derives every stored ballot hash from its raw vote rows using the
//! server-held secret and checks the chain links, reporting findings instead
//! of failing fast.
//!
//! ## Two independent checks
//!
//! - **Re-hash check**: recompute each ballot's hash from its vote rows and
//!   the predecessor's stored hash. A mismatch (`HASH_MISMATCH`) pins
//!   vote-content tampering to the altered ballot instead of cascading down
//!   the chain.
//! - **Link check**: compare each ballot's stored `previous_ballot_hash`
//!   against its predecessor's stored hash (`CHAIN_BROKEN`), and require the
//!   first ballot to link to nothing (`INVALID_GENESIS`). This catches
//!   reordering and splices.
//!
//! Both checks run for every ballot; all findings are collected into one
//! report.

pub mod error;
pub mod report;
pub mod verifier;

pub use error::VerifyError;
pub use report::{IntegrityIssue, IntegrityReport, IssueKind, SweepReport};
pub use verifier::IntegrityVerifier;
