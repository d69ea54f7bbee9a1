//! Request and response types for the remote repository gateway.

use serde::{Deserialize, Serialize};

/// One file to include in a gateway commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitFile {
    /// Path relative to the conversation workspace; the gateway prefixes
    /// the base path when building the tree.
    pub path: String,
    /// Full file content.
    pub content: String,
}

/// A fully-resolved multi-file commit for the gateway to execute atomically.
///
/// Credentials travel separately; this struct is safe to log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayCommitRequest {
    /// Target repository as "owner/name".
    pub repository: String,
    /// Target branch; created from the default branch if missing.
    pub branch: String,
    /// Directory prefix for all files ("" commits at the repository root).
    pub base_path: String,
    /// Commit message.
    pub message: String,
    /// Files to commit; at least one.
    pub files: Vec<CommitFile>,
}

/// Outcome of a successful gateway commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayCommit {
    /// SHA of the created commit.
    pub sha: String,
    /// Branch the commit landed on.
    pub branch: String,
    /// Whether the branch was created as part of this commit.
    pub branch_created: bool,
}

impl GatewayCommitRequest {
    /// Join the base path with a file path, normalizing separators.
    pub fn full_path(&self, file_path: &str) -> String {
        let base = self.base_path.trim_matches('/');
        let file = file_path.trim_start_matches('/');
        if base.is_empty() {
            file.to_string()
        } else {
            format!("{base}/{file}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_base(base_path: &str) -> GatewayCommitRequest {
        GatewayCommitRequest {
            repository: "octo/site".to_string(),
            branch: "main".to_string(),
            base_path: base_path.to_string(),
            message: "msg".to_string(),
            files: vec![],
        }
    }

    #[test]
    fn test_full_path_empty_base() {
        let req = request_with_base("");
        assert_eq!(req.full_path("main.py"), "main.py");
    }

    #[test]
    fn test_full_path_with_base() {
        let req = request_with_base("src");
        assert_eq!(req.full_path("main.py"), "src/main.py");
    }

    #[test]
    fn test_full_path_normalizes_slashes() {
        let req = request_with_base("/src/app/");
        assert_eq!(req.full_path("/lib/util.py"), "src/app/lib/util.py");
    }
}
