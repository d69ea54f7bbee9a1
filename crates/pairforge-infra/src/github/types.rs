//! GitHub REST API wire types.
//!
//! These are the request/response shapes specific to the GitHub Git Data
//! endpoints, distinct from the gateway-agnostic types in `pairforge-types`.
//! Only the fields the gateway actually reads are deserialized.

use serde::{Deserialize, Serialize};

/// Response from `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoResponse {
    pub default_branch: String,
}

/// Response from `GET /repos/{owner}/{repo}/git/ref/{ref}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RefResponse {
    pub object: GitObject,
}

/// The object a git ref points at.
#[derive(Debug, Clone, Deserialize)]
pub struct GitObject {
    pub sha: String,
}

/// Response from the commit endpoints (`GET`/`POST /git/commits`).
#[derive(Debug, Clone, Deserialize)]
pub struct CommitResponse {
    pub sha: String,
    pub tree: TreeRef,
}

/// The tree a commit points at.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeRef {
    pub sha: String,
}

/// Response from the blob and tree creation endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ShaResponse {
    pub sha: String,
}

/// Request body for `POST /git/blobs`.
#[derive(Debug, Clone, Serialize)]
pub struct NewBlob {
    pub content: String,
    pub encoding: &'static str,
}

impl NewBlob {
    pub fn utf8(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            encoding: "utf-8",
        }
    }
}

/// A single entry in a new tree.
#[derive(Debug, Clone, Serialize)]
pub struct NewTreeEntry {
    pub path: String,
    pub mode: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub sha: String,
}

impl NewTreeEntry {
    /// A regular (non-executable) file entry pointing at an existing blob.
    pub fn blob(path: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: "100644",
            kind: "blob",
            sha: sha.into(),
        }
    }
}

/// Request body for `POST /git/trees`.
#[derive(Debug, Clone, Serialize)]
pub struct NewTree {
    pub base_tree: String,
    pub tree: Vec<NewTreeEntry>,
}

/// Request body for `POST /git/commits`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCommit {
    pub message: String,
    pub tree: String,
    pub parents: Vec<String>,
}

/// Request body for `POST /git/refs`.
#[derive(Debug, Clone, Serialize)]
pub struct NewRef {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub sha: String,
}

/// Request body for `PATCH /git/refs/{ref}`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRef {
    pub sha: String,
    pub force: bool,
}
