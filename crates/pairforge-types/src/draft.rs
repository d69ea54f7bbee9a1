use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::conversation::ConversationId;

use std::fmt;
use std::str::FromStr;

/// Unique identifier for a draft, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftId(pub Uuid);

impl DraftId {
    /// Create a new DraftId using UUID v7 (time-sortable, guaranteed ordering).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create a DraftId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for DraftId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DraftId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A staged AI-generated revision of a single file within a conversation.
///
/// Drafts are immutable once created except for their status and the review
/// timestamps. Rejected drafts are retained for audit, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub id: DraftId,
    /// The conversation this draft belongs to.
    pub conversation_id: ConversationId,
    /// Target filename (relative path inside the conversation workspace).
    pub filename: String,
    /// Full proposed file content.
    pub content: String,
    /// SHA-256 hex digest of the content.
    pub content_hash: String,
    /// Content length in bytes at submission time.
    pub content_length: i64,
    /// Completeness score from validation (0.0 to 1.0).
    pub completeness_score: f64,
    /// Validation issues in check order; empty for clean content.
    pub issues: Vec<String>,
    /// Current review state.
    pub status: DraftStatus,
    pub created_at: DateTime<Utc>,
    /// Set when the draft is approved or rejected.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Set when the draft's content becomes the latest file version.
    pub promoted_at: Option<DateTime<Utc>>,
}

/// Draft review states.
///
/// - Pending: scored below the auto-promotion threshold, awaiting review
/// - Approved: accepted by a reviewer, not yet promoted
/// - Rejected: declined by a reviewer (terminal, retained for audit)
/// - Promoted: content became the latest file version (terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    Pending,
    Approved,
    Rejected,
    Promoted,
}

impl fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftStatus::Pending => write!(f, "pending"),
            DraftStatus::Approved => write!(f, "approved"),
            DraftStatus::Rejected => write!(f, "rejected"),
            DraftStatus::Promoted => write!(f, "promoted"),
        }
    }
}

impl FromStr for DraftStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(DraftStatus::Pending),
            "approved" => Ok(DraftStatus::Approved),
            "rejected" => Ok(DraftStatus::Rejected),
            "promoted" => Ok(DraftStatus::Promoted),
            other => Err(format!("invalid draft status: '{other}'")),
        }
    }
}

impl Default for DraftStatus {
    fn default() -> Self {
        DraftStatus::Pending
    }
}

/// Request to submit AI-generated content as a draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitDraftRequest {
    pub filename: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_id_display_parse() {
        let id = DraftId::new();
        let s = id.to_string();
        let parsed: DraftId = s.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_draft_status_roundtrip() {
        for status in [
            DraftStatus::Pending,
            DraftStatus::Approved,
            DraftStatus::Rejected,
            DraftStatus::Promoted,
        ] {
            let s = status.to_string();
            let parsed: DraftStatus = s.parse().unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_draft_status_serde_lowercase() {
        let json = serde_json::to_string(&DraftStatus::Promoted).unwrap();
        assert_eq!(json, "\"promoted\"");
        let parsed: DraftStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(parsed, DraftStatus::Pending);
    }

    #[test]
    fn test_draft_serde_roundtrip() {
        let draft = Draft {
            id: DraftId::new(),
            conversation_id: ConversationId::new(),
            filename: "src/main.py".to_string(),
            content: "print('hello')".to_string(),
            content_hash: "abc123".to_string(),
            content_length: 14,
            completeness_score: 0.65,
            issues: vec!["placeholder markers found: todo: implement".to_string()],
            status: DraftStatus::Pending,
            created_at: Utc::now(),
            reviewed_at: None,
            promoted_at: None,
        };
        let json = serde_json::to_string(&draft).unwrap();
        let parsed: Draft = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, draft.id);
        assert_eq!(parsed.status, DraftStatus::Pending);
        assert_eq!(parsed.issues.len(), 1);
    }
}
