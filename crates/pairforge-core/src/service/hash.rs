//! Content hashing abstraction.

/// Port for hashing draft and version content.
///
/// The same hasher is used for drafts and promoted versions so the two
/// records of one promotion carry the same digest.
pub trait ContentHasher: Send + Sync {
    /// Compute a stable hash of the content.
    fn compute_hash(&self, content: &str) -> String;
}
