//! Cryptographic operations for Pairforge.
//!
//! - `hash`: SHA-256 content hashing for draft and version integrity

pub mod hash;
