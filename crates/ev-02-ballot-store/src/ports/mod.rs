//! Port traits for the Ballot Store subsystem. The driven (storage) ports
//! live in `shared-types`; only the driving API is defined here.

pub mod inbound;
