//! # Counting Engine (ev-04)
//!
//! Tallies an ended election's ballots and allocates seats under one of
//! five counting methods, producing versioned, finalisable result records.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | No Early Counting | Counting requires `now >= election.end` |
//! | 2 | Valid Ballots Only | The tally sums vote rows of valid ballots; spoiled ballots are counted separately |
//! | 3 | Contiguous Versions | Result versions run 1, 2, 3, ... per election |
//! | 4 | Terminal Finalisation | At most one final result; afterwards no new versions |
//! | 5 | Deterministic Ties | Tie-break is ascending listnum; all contenders of the decisive seat are flagged |
//!
//! ## Algorithms
//!
//! - `sainte_lague` - divisor method (1, 3, 5, ...)
//! - `hare_niemeyer` - largest remainder
//! - `highest_votes_simple` - plurality
//! - `highest_votes_absolute` - plurality with absolute-majority threshold
//! - `yes_no_referendum` - yes/no/abstain with fixed listnum mapping
//!
//! Seat allocation never compares floating point: quotients are compared by
//! u128 cross-multiplication and remainders over a common denominator.

pub mod domain;
pub mod service;

pub use domain::errors::CountError;
pub use domain::majority::count_highest_votes;
pub use domain::proportional::{count_hare_niemeyer, count_sainte_lague};
pub use domain::referendum::count_referendum;
pub use domain::result_data::{
    CandidateCount, CandidateResult, ReferendumCount, ReferendumOutcome, ResultData,
    SeatAllocation,
};
pub use domain::tally::ElectionTally;
pub use service::CountingService;
