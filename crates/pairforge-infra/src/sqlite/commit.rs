//! SQLite commit log implementation.
//!
//! Insert-only: rows are written after a commit lands on the remote and are
//! never updated or deleted.

use pairforge_core::store::commit::CommitLog;
use pairforge_types::commit::{CommitRecord, CommitRecordId};
use pairforge_types::conversation::ConversationId;
use pairforge_types::error::StoreError;
use sqlx::Row;

use super::draft::{format_datetime, parse_datetime};
use super::pool::DatabasePool;

/// SQLite-backed implementation of `CommitLog`.
pub struct SqliteCommitLog {
    pool: DatabasePool,
}

impl SqliteCommitLog {
    /// Create a new log backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<CommitRecord, StoreError> {
    let id_str: String = row
        .try_get("id")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let conversation_id_str: String = row
        .try_get("conversation_id")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let repository: String = row
        .try_get("repository")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let branch: String = row
        .try_get("branch")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let base_path: String = row
        .try_get("base_path")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let message: String = row
        .try_get("message")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let commit_sha: String = row
        .try_get("commit_sha")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let file_count: i64 = row
        .try_get("file_count")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let filenames_json: String = row
        .try_get("filenames")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let committed_at_str: String = row
        .try_get("committed_at")
        .map_err(|e| StoreError::Query(e.to_string()))?;

    Ok(CommitRecord {
        id: id_str
            .parse::<CommitRecordId>()
            .map_err(|e| StoreError::Query(format!("invalid commit record id: {e}")))?,
        conversation_id: conversation_id_str
            .parse::<ConversationId>()
            .map_err(|e| StoreError::Query(format!("invalid conversation id: {e}")))?,
        repository,
        branch,
        base_path,
        message,
        commit_sha,
        file_count,
        filenames: serde_json::from_str(&filenames_json)
            .map_err(|e| StoreError::Query(format!("invalid filenames json: {e}")))?,
        committed_at: parse_datetime(&committed_at_str)?,
    })
}

impl CommitLog for SqliteCommitLog {
    async fn record(&self, record: &CommitRecord) -> Result<CommitRecord, StoreError> {
        let filenames_json = serde_json::to_string(&record.filenames)
            .map_err(|e| StoreError::Query(format!("failed to serialize filenames: {e}")))?;

        sqlx::query(
            "INSERT INTO commit_records (id, conversation_id, repository, branch, base_path,
                                         message, commit_sha, file_count, filenames, committed_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.id.to_string())
        .bind(record.conversation_id.to_string())
        .bind(&record.repository)
        .bind(&record.branch)
        .bind(&record.base_path)
        .bind(&record.message)
        .bind(&record.commit_sha)
        .bind(record.file_count)
        .bind(&filenames_json)
        .bind(format_datetime(&record.committed_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(record.clone())
    }

    async fn list(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<CommitRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM commit_records WHERE conversation_id = ?
             ORDER BY committed_at DESC",
        )
        .bind(conversation_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(row_to_record(row)?);
        }
        Ok(records)
    }
}
