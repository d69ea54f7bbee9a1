//! SHA-256 content hashing for draft and version integrity.
//!
//! Implements the `ContentHasher` trait from `pairforge-core` using the
//! `sha2` crate (RustCrypto ecosystem).

use sha2::{Digest, Sha256};

use pairforge_core::service::hash::ContentHasher;

/// SHA-256 implementation of `ContentHasher`.
///
/// Computes lowercase hex-encoded SHA-256 digests of content strings. A
/// promoted version carries the same digest as the draft it came from, so
/// the audit trail can be verified end to end.
pub struct Sha256ContentHasher;

impl Sha256ContentHasher {
    /// Create a new hasher.
    pub fn new() -> Self {
        Self
    }
}

impl Default for Sha256ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentHasher for Sha256ContentHasher {
    fn compute_hash(&self, content: &str) -> String {
        let digest = Sha256::digest(content.as_bytes());
        format!("{:x}", digest)
    }
}
