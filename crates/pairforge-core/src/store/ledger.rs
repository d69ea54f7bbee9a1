//! File version ledger trait definition.

use pairforge_types::conversation::ConversationId;
use pairforge_types::error::StoreError;
use pairforge_types::version::{FileVersion, NewFileVersion};

/// Storage trait for the per-file version ledger.
///
/// The ledger owns version numbering: both writes run inside one storage
/// transaction and assign the row id, timestamp, and version number there,
/// so two racing writers can never claim the same number. Invariants held
/// by every implementation:
///
/// - at most one `latest` row per `(conversation_id, filename)`
/// - version numbers per key are gap-free from 1
/// - superseded rows are demoted to `modified` and never change again
pub trait VersionLedger: Send + Sync {
    /// Record version 1 of a file with `original` status.
    ///
    /// Fails with `StoreError::Conflict` if any version already exists for
    /// the key, unless `overwrite` is set and version 1 is still the key's
    /// only entry, in which case its content is replaced in place.
    fn record_initial(
        &self,
        file: &NewFileVersion,
        overwrite: bool,
    ) -> impl std::future::Future<Output = Result<FileVersion, StoreError>> + Send;

    /// Append a new version as `latest`, demoting the current tip.
    ///
    /// One transaction: the current non-modified tip (latest, or the
    /// original version 1) becomes `modified`, and the new row is inserted
    /// with the next version number.
    fn promote(
        &self,
        file: &NewFileVersion,
    ) -> impl std::future::Future<Output = Result<FileVersion, StoreError>> + Send;

    /// All files in a conversation that currently have a `latest` version,
    /// ordered by filename. Exactly one entry per filename.
    fn latest_snapshot(
        &self,
        conversation_id: &ConversationId,
    ) -> impl std::future::Future<Output = Result<Vec<FileVersion>, StoreError>> + Send;

    /// Full version history for one file, ascending by version number.
    fn history(
        &self,
        conversation_id: &ConversationId,
        filename: &str,
    ) -> impl std::future::Future<Output = Result<Vec<FileVersion>, StoreError>> + Send;
}
