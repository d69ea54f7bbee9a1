//! Commit record store trait definition.

use pairforge_types::commit::CommitRecord;
use pairforge_types::conversation::ConversationId;
use pairforge_types::error::StoreError;

/// Storage trait for the commit audit log.
///
/// Records are insert-only: one row per successful remote commit, written
/// after the remote side confirmed the ref update.
pub trait CommitLog: Send + Sync {
    /// Persist a commit record. Returns the stored record.
    fn record(
        &self,
        record: &CommitRecord,
    ) -> impl std::future::Future<Output = Result<CommitRecord, StoreError>> + Send;

    /// List commit records for a conversation, newest first.
    fn list(
        &self,
        conversation_id: &ConversationId,
    ) -> impl std::future::Future<Output = Result<Vec<CommitRecord>, StoreError>> + Send;
}
