//! Pure domain logic: canonical ballot hashing and structural validation.

pub mod errors;
pub mod hasher;
pub mod validator;
