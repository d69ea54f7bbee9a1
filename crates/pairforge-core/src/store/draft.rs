//! Draft store trait definition.

use chrono::{DateTime, Utc};
use pairforge_types::conversation::ConversationId;
use pairforge_types::draft::{Draft, DraftId, DraftStatus};
use pairforge_types::error::StoreError;

/// Storage trait for draft persistence.
///
/// Implementations live in pairforge-infra (e.g., SqliteDraftStore).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait DraftStore: Send + Sync {
    /// Insert a new draft. Returns the inserted draft.
    fn insert(
        &self,
        draft: &Draft,
    ) -> impl std::future::Future<Output = Result<Draft, StoreError>> + Send;

    /// Get a draft by its unique ID.
    fn get(
        &self,
        id: &DraftId,
    ) -> impl std::future::Future<Output = Result<Option<Draft>, StoreError>> + Send;

    /// List drafts for a conversation, newest first, optionally filtered by
    /// status.
    fn list(
        &self,
        conversation_id: &ConversationId,
        status: Option<DraftStatus>,
    ) -> impl std::future::Future<Output = Result<Vec<Draft>, StoreError>> + Send;

    /// Conditionally move a draft from one status to another.
    ///
    /// The update only applies while the stored status still equals `from`,
    /// and returns the number of rows changed (0 means the draft vanished or
    /// another transition won the race). `at` lands in `reviewed_at` for
    /// approve/reject and in `promoted_at` for promotion.
    fn transition(
        &self,
        id: &DraftId,
        from: DraftStatus,
        to: DraftStatus,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;
}
