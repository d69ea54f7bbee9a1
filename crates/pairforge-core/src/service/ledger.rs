//! Version ledger service.

use pairforge_types::conversation::ConversationId;
use pairforge_types::error::{LedgerError, StoreError};
use pairforge_types::version::{FileVersion, NewFileVersion, RecordFileRequest};
use tracing::info;

use crate::service::hash::ContentHasher;
use crate::store::ledger::VersionLedger;

/// Read and import operations on the per-conversation version ledger.
///
/// Promotions do not go through this service; the draft pipeline writes
/// promoted versions directly so draft and ledger updates stay on one
/// code path.
pub struct LedgerService<L, H> {
    ledger: L,
    hasher: H,
}

impl<L, H> LedgerService<L, H>
where
    L: VersionLedger,
    H: ContentHasher,
{
    pub fn new(ledger: L, hasher: H) -> Self {
        Self { ledger, hasher }
    }

    /// Record a file that existed before the assistant touched it.
    ///
    /// The entry lands as version 1 with ORIGINAL status. A second import of
    /// the same filename fails with `DuplicateFile` unless `overwrite` is
    /// set, and overwrite itself is refused once promotions exist for the
    /// file.
    pub async fn import_file(
        &self,
        conversation_id: &ConversationId,
        request: &RecordFileRequest,
    ) -> Result<FileVersion, LedgerError> {
        let file = NewFileVersion {
            conversation_id: conversation_id.clone(),
            filename: request.filename.clone(),
            content: request.content.clone(),
            content_hash: self.hasher.compute_hash(&request.content),
            source_draft_id: None,
        };

        let version = self
            .ledger
            .record_initial(&file, request.overwrite)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => LedgerError::DuplicateFile(request.filename.clone()),
                other => LedgerError::StorageError(other.to_string()),
            })?;

        info!(
            conversation_id = %conversation_id,
            filename = %version.filename,
            overwrite = request.overwrite,
            "Recorded original file"
        );
        Ok(version)
    }

    /// Current latest version per file, ordered by filename.
    ///
    /// Imports that were never promoted over carry no latest row and do
    /// not appear here.
    pub async fn snapshot(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<FileVersion>, LedgerError> {
        self.ledger
            .latest_snapshot(conversation_id)
            .await
            .map_err(|e| LedgerError::StorageError(e.to_string()))
    }

    /// Full history of one file, oldest first.
    pub async fn file_history(
        &self,
        conversation_id: &ConversationId,
        filename: &str,
    ) -> Result<Vec<FileVersion>, LedgerError> {
        self.ledger
            .history(conversation_id, filename)
            .await
            .map_err(|e| LedgerError::StorageError(e.to_string()))
    }
}
