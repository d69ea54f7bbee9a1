//! SQLite draft store implementation.
//!
//! Implements `DraftStore` from `pairforge-core` using sqlx with split
//! read/write pools. Draft rows are immutable apart from status and the
//! review timestamps, which change only through the conditional
//! `transition` update.

use chrono::{DateTime, Utc};
use pairforge_core::store::draft::DraftStore;
use pairforge_types::conversation::ConversationId;
use pairforge_types::draft::{Draft, DraftId, DraftStatus};
use pairforge_types::error::StoreError;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `DraftStore`.
pub struct SqliteDraftStore {
    pool: DatabasePool,
}

impl SqliteDraftStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn row_to_draft(row: &sqlx::sqlite::SqliteRow) -> Result<Draft, StoreError> {
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
    let content_length: i64 = row
        .try_get("content_length")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let completeness_score: f64 = row
        .try_get("completeness_score")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let issues_json: String = row
        .try_get("issues")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let status_str: String = row
        .try_get("status")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let created_at_str: String = row
        .try_get("created_at")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let reviewed_at_str: Option<String> = row
        .try_get("reviewed_at")
        .map_err(|e| StoreError::Query(e.to_string()))?;
    let promoted_at_str: Option<String> = row
        .try_get("promoted_at")
        .map_err(|e| StoreError::Query(e.to_string()))?;

    Ok(Draft {
        id: id_str
            .parse::<DraftId>()
            .map_err(|e| StoreError::Query(format!("invalid draft id: {e}")))?,
        conversation_id: conversation_id_str
            .parse::<ConversationId>()
            .map_err(|e| StoreError::Query(format!("invalid conversation id: {e}")))?,
        filename,
        content,
        content_hash,
        content_length,
        completeness_score,
        issues: serde_json::from_str(&issues_json)
            .map_err(|e| StoreError::Query(format!("invalid issues json: {e}")))?,
        status: status_str
            .parse::<DraftStatus>()
            .map_err(|e| StoreError::Query(e))?,
        created_at: parse_datetime(&created_at_str)?,
        reviewed_at: reviewed_at_str.as_deref().map(parse_datetime).transpose()?,
        promoted_at: promoted_at_str.as_deref().map(parse_datetime).transpose()?,
    })
}

impl DraftStore for SqliteDraftStore {
    async fn insert(&self, draft: &Draft) -> Result<Draft, StoreError> {
        let issues_json = serde_json::to_string(&draft.issues)
            .map_err(|e| StoreError::Query(format!("failed to serialize issues: {e}")))?;

        sqlx::query(
            "INSERT INTO drafts (id, conversation_id, filename, content, content_hash,
                                 content_length, completeness_score, issues, status,
                                 created_at, reviewed_at, promoted_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, NULL)",
        )
        .bind(draft.id.to_string())
        .bind(draft.conversation_id.to_string())
        .bind(&draft.filename)
        .bind(&draft.content)
        .bind(&draft.content_hash)
        .bind(draft.content_length)
        .bind(draft.completeness_score)
        .bind(&issues_json)
        .bind(draft.status.to_string())
        .bind(format_datetime(&draft.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.message().contains("UNIQUE") {
                    return StoreError::Conflict(format!("draft {} already exists", draft.id));
                }
            }
            StoreError::Query(e.to_string())
        })?;

        Ok(draft.clone())
    }

    async fn get(&self, id: &DraftId) -> Result<Option<Draft>, StoreError> {
        let row = sqlx::query("SELECT * FROM drafts WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        match row {
            Some(row) => Ok(Some(row_to_draft(&row)?)),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        conversation_id: &ConversationId,
        status: Option<DraftStatus>,
    ) -> Result<Vec<Draft>, StoreError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(
                    "SELECT * FROM drafts WHERE conversation_id = ? AND status = ?
                     ORDER BY created_at DESC",
                )
                .bind(conversation_id.to_string())
                .bind(status.to_string())
                .fetch_all(&self.pool.reader)
                .await
            }
            None => {
                sqlx::query(
                    "SELECT * FROM drafts WHERE conversation_id = ? ORDER BY created_at DESC",
                )
                .bind(conversation_id.to_string())
                .fetch_all(&self.pool.reader)
                .await
            }
        }
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut drafts = Vec::with_capacity(rows.len());
        for row in &rows {
            drafts.push(row_to_draft(row)?);
        }
        Ok(drafts)
    }

    async fn transition(
        &self,
        id: &DraftId,
        from: DraftStatus,
        to: DraftStatus,
        at: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        // The WHERE clause on the current status makes this a compare-and-swap.
        let result = match to {
            DraftStatus::Approved | DraftStatus::Rejected => {
                sqlx::query(
                    "UPDATE drafts SET status = ?, reviewed_at = ? WHERE id = ? AND status = ?",
                )
                .bind(to.to_string())
                .bind(format_datetime(&at))
                .bind(id.to_string())
                .bind(from.to_string())
                .execute(&self.pool.writer)
                .await
            }
            DraftStatus::Promoted => {
                sqlx::query(
                    "UPDATE drafts SET status = ?, promoted_at = ? WHERE id = ? AND status = ?",
                )
                .bind(to.to_string())
                .bind(format_datetime(&at))
                .bind(id.to_string())
                .bind(from.to_string())
                .execute(&self.pool.writer)
                .await
            }
            DraftStatus::Pending => {
                sqlx::query("UPDATE drafts SET status = ? WHERE id = ? AND status = ?")
                    .bind(to.to_string())
                    .bind(id.to_string())
                    .bind(from.to_string())
                    .execute(&self.pool.writer)
                    .await
            }
        }
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
