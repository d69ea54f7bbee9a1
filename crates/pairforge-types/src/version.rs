use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::conversation::ConversationId;
use crate::draft::DraftId;

use std::fmt;
use std::str::FromStr;

/// Unique identifier for a file version row, wrapping a UUID v7.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileVersionId(pub Uuid);

impl FileVersionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for FileVersionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FileVersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FileVersionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// One immutable version of a file within a conversation.
///
/// Versions per `(conversation_id, filename)` form a gap-free sequence from 1.
/// At most one version per key is authoritative (`Original` until the first
/// promotion, `Latest` after); superseded versions are demoted to `Modified`
/// and never revert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileVersion {
    pub id: FileVersionId,
    /// The conversation this file belongs to.
    pub conversation_id: ConversationId,
    /// Relative path inside the conversation workspace.
    pub filename: String,
    /// Full content snapshot for this version.
    pub content: String,
    /// SHA-256 hex digest of the content.
    pub content_hash: String,
    /// Content size in bytes.
    pub size_bytes: i64,
    /// Version number (1-based, strictly increasing per file, gap-free).
    pub version: i32,
    /// Lifecycle state of this version row.
    pub status: FileStatus,
    /// The draft this version was promoted from; None for imported files.
    pub source_draft_id: Option<DraftId>,
    pub created_at: DateTime<Utc>,
}

/// File version lifecycle states.
///
/// - Original: imported version 1 that has never been superseded
/// - Modified: a superseded historical version
/// - Latest: the single authoritative version for the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Original,
    Modified,
    Latest,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Original => write!(f, "original"),
            FileStatus::Modified => write!(f, "modified"),
            FileStatus::Latest => write!(f, "latest"),
        }
    }
}

impl FromStr for FileStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "original" => Ok(FileStatus::Original),
            "modified" => Ok(FileStatus::Modified),
            "latest" => Ok(FileStatus::Latest),
            other => Err(format!("invalid file status: '{other}'")),
        }
    }
}

/// Input for creating a file version row.
///
/// The version number, row id, and timestamp are assigned by the ledger
/// inside its transaction, so callers only describe the content.
#[derive(Debug, Clone)]
pub struct NewFileVersion {
    pub conversation_id: ConversationId,
    pub filename: String,
    pub content: String,
    /// SHA-256 hex digest of the content.
    pub content_hash: String,
    /// The draft being promoted; None for imported files.
    pub source_draft_id: Option<DraftId>,
}

/// Request to import the initial version of a file into a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordFileRequest {
    pub filename: String,
    pub content: String,
    /// Replace version 1 in place if the file was already imported.
    /// Ignored (fails with DuplicateFile) once promoted history exists.
    #[serde(default)]
    pub overwrite: bool,
}
