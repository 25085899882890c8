//! # BallotChain Test Suite
//!
//! Unified test crate for flows that span more than one subsystem.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Cross-subsystem choreography
//!     ├── casting_flow.rs    # Concurrent casting, snapshot persistence
//!     ├── integrity_flow.rs  # Cast then verify, tamper detection
//!     └── counting_flow.rs   # Full election lifecycle through counting
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ev-tests
//!
//! # By category
//! cargo test -p ev-tests integration::
//! ```

#![allow(dead_code)]

pub mod integration;
