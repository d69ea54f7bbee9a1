use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::conversation::ConversationId;

use std::fmt;
use std::str::FromStr;

/// Unique identifier for a commit record, wrapping a UUID v7.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitRecordId(pub Uuid);

impl CommitRecordId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for CommitRecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommitRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CommitRecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Audit record of one successful multi-file commit to a remote repository.
///
/// Created only after the remote write succeeded. Failed commit attempts
/// leave no record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    pub id: CommitRecordId,
    /// The conversation whose snapshot was committed.
    pub conversation_id: ConversationId,
    /// Target repository as "owner/name".
    pub repository: String,
    /// Branch the commit landed on.
    pub branch: String,
    /// Directory prefix the files were placed under ("" for repository root).
    pub base_path: String,
    /// Commit message used.
    pub message: String,
    /// SHA of the created commit.
    pub commit_sha: String,
    /// Number of files included.
    pub file_count: i64,
    /// Exact set of filenames included, in snapshot order.
    pub filenames: Vec<String>,
    pub committed_at: DateTime<Utc>,
}

/// Request to commit a conversation's current file snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRequest {
    /// Target repository as "owner/name".
    pub repository: String,
    /// Target branch; created from the default branch if missing.
    pub branch: String,
    /// Commit message; a default is generated when absent.
    pub message: Option<String>,
    /// Directory prefix to place files under ("" commits at the root).
    #[serde(default)]
    pub base_path: String,
    /// Access token override; falls back to the configured provider chain.
    pub token: Option<String>,
    /// Upper bound on the remote operation, in seconds.
    pub timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_record_id_display_parse() {
        let id = CommitRecordId::new();
        let s = id.to_string();
        let parsed: CommitRecordId = s.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_commit_request_minimal_json() {
        let json = r#"{"repository": "octo/site", "branch": "main"}"#;
        let req: CommitRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.repository, "octo/site");
        assert_eq!(req.base_path, "");
        assert!(req.message.is_none());
        assert!(req.token.is_none());
        assert!(req.timeout_secs.is_none());
    }

    #[test]
    fn test_commit_record_serde_roundtrip() {
        let record = CommitRecord {
            id: CommitRecordId::new(),
            conversation_id: ConversationId::new(),
            repository: "octo/site".to_string(),
            branch: "main".to_string(),
            base_path: "src".to_string(),
            message: "Update 2 file(s) from Pairforge".to_string(),
            commit_sha: "deadbeef".to_string(),
            file_count: 2,
            filenames: vec!["a.py".to_string(), "b.py".to_string()],
            committed_at: Utc::now(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: CommitRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.commit_sha, "deadbeef");
        assert_eq!(parsed.filenames.len(), 2);
    }
}
