//! SQLite file version ledger implementation.
//!
//! Implements `VersionLedger` from `pairforge-core`. Version numbers are
//! assigned inside the write transaction (`MAX(version) + 1`), and the
//! `UNIQUE(conversation_id, filename, version)` constraint turns any racing
//! writer into a conflict instead of a forked sequence. Demotion happens in
//! the same transaction, so at most one row per file is ever non-modified.

use chrono::Utc;
use pairforge_core::store::ledger::VersionLedger;
use pairforge_types::conversation::ConversationId;
use pairforge_types::draft::DraftId;
use pairforge_types::error::StoreError;
use pairforge_types::version::{FileStatus, FileVersion, FileVersionId, NewFileVersion};
use sqlx::Row;

use super::draft::{format_datetime, parse_datetime};
use super::pool::DatabasePool;

/// SQLite-backed implementation of `VersionLedger`.
pub struct SqliteVersionLedger {
    pool: DatabasePool,
}

impl SqliteVersionLedger {
    /// Create a new ledger backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_version(row: &sqlx::sqlite::SqliteRow) -> Result<FileVersion, StoreError> {
    let id_str: String = row
        .try_get("id")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let conversation_id_str: String = row
        .try_get("conversation_id")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let filename: String = row
        .try_get("filename")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let content: String = row
        .try_get("content")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let content_hash: String = row
        .try_get("content_hash")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let size_bytes: i64 = row
        .try_get("size_bytes")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let version: i32 = row
        .try_get("version")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let status_str: String = row
        .try_get("status")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let source_draft_id_str: Option<String> = row
        .try_get("source_draft_id")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let created_at_str: String = row
        .try_get("created_at")
        .map_err(|e| StoreError::Query(e.to_string()))?;

    Ok(FileVersion {
        id: id_str
            .parse::<FileVersionId>()
            .map_err(|e| StoreError::Query(format!("invalid version id: {e}")))?,
        conversation_id: conversation_id_str
            .parse::<ConversationId>()
            .map_err(|e| StoreError::Query(format!("invalid conversation id: {e}")))?,
        filename,
        content,
        content_hash,
        size_bytes,
        version,
        status: status_str.parse::<FileStatus>().map_err(StoreError::Query)?,
        source_draft_id: source_draft_id_str
            .map(|s| {
                s.parse::<DraftId>()
                    .map_err(|e| StoreError::Query(format!("invalid draft id: {e}")))
            })
            .transpose()?,
        created_at: parse_datetime(&created_at_str)?,
    })
}

async fn insert_version(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    file: &NewFileVersion,
    version: i32,
    status: FileStatus,
) -> Result<FileVersion, StoreError> {
    let record = FileVersion {
        id: FileVersionId::new(),
        conversation_id: file.conversation_id.clone(),
        filename: file.filename.clone(),
        content: file.content.clone(),
        content_hash: file.content_hash.clone(),
        size_bytes: file.content.len() as i64,
        version,
        status,
        source_draft_id: file.source_draft_id.clone(),
        created_at: Utc::now(),
    };

    sqlx::query(
        "INSERT INTO file_versions (id, conversation_id, filename, content, content_hash,
                                    size_bytes, version, status, source_draft_id, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(record.id.to_string())
    .bind(record.conversation_id.to_string())
    .bind(&record.filename)
    .bind(&record.content)
    .bind(&record.content_hash)
    .bind(record.size_bytes)
    .bind(record.version)
    .bind(record.status.to_string())
    .bind(record.source_draft_id.as_ref().map(|id| id.to_string()))
    .bind(format_datetime(&record.created_at))
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.message().contains("UNIQUE") {
                return StoreError::Conflict(format!(
                    "version {} already exists for '{}'",
                    record.version, record.filename
                ));
            }
        }
        StoreError::Query(e.to_string())
    })?;

    Ok(record)
}

impl VersionLedger for SqliteVersionLedger {
    async fn record_initial(
        &self,
        file: &NewFileVersion,
        overwrite: bool,
    ) -> Result<FileVersion, StoreError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM file_versions WHERE conversation_id = ? AND filename = ?",
        )
        .bind(file.conversation_id.to_string())
        .bind(&file.filename)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;
        let existing: i64 = row
            .try_get("n")
            .map_err(|e| StoreError::Query(e.to_string()))?;

        if existing > 0 {
            // Overwrite replaces version 1 in place, but only while the
            // import is still the whole history.
            if !overwrite || existing > 1 {
                return Err(StoreError::Conflict(format!(
                    "file '{}' already has a recorded version",
                    file.filename
                )));
            }
            sqlx::query(
                "DELETE FROM file_versions WHERE conversation_id = ? AND filename = ?",
            )
            .bind(file.conversation_id.to_string())
            .bind(&file.filename)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        }

        let record = insert_version(&mut tx, file, 1, FileStatus::Original).await?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(record)
    }

    async fn promote(&self, file: &NewFileVersion) -> Result<FileVersion, StoreError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let row = sqlx::query(
            "SELECT COALESCE(MAX(version), 0) AS current
             FROM file_versions WHERE conversation_id = ? AND filename = ?",
        )
        .bind(file.conversation_id.to_string())
        .bind(&file.filename)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;
        let current: i32 = row
            .try_get("current")
            .map_err(|e| StoreError::Query(e.to_string()))?;

        // Demote whatever was authoritative; superseded rows never revert.
        sqlx::query(
            "UPDATE file_versions SET status = 'modified'
             WHERE conversation_id = ? AND filename = ? AND status != 'modified'",
        )
        .bind(file.conversation_id.to_string())
        .bind(&file.filename)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let record = insert_version(&mut tx, file, current + 1, FileStatus::Latest).await?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(record)
    }

    async fn latest_snapshot(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<FileVersion>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM file_versions
             WHERE conversation_id = ? AND status = 'latest'
             ORDER BY filename ASC",
        )
        .bind(conversation_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut versions = Vec::with_capacity(rows.len());
        for row in &rows {
            versions.push(row_to_version(row)?);
        }
        Ok(versions)
    }

    async fn history(
        &self,
        conversation_id: &ConversationId,
        filename: &str,
    ) -> Result<Vec<FileVersion>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM file_versions
             WHERE conversation_id = ? AND filename = ?
             ORDER BY version ASC",
        )
        .bind(conversation_id.to_string())
        .bind(filename)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut versions = Vec::with_capacity(rows.len());
        for row in &rows {
            versions.push(row_to_version(row)?);
        }
        Ok(versions)
    }
}
