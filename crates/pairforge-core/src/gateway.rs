//! Remote repository gateway trait definition.

use pairforge_types::error::GatewayError;
use pairforge_types::gateway::{GatewayCommit, GatewayCommitRequest};

/// Trait for the remote source-control host.
///
/// One call commits a set of files atomically: the remote either ends up
/// with a new commit containing every file or is left untouched. Branch
/// resolution (including creating the branch from the repository's default
/// branch when it does not exist) is the gateway's responsibility.
///
/// The token is passed per call because credentials are resolved per
/// request, not fixed at construction.
pub trait RepositoryGateway: Send + Sync {
    /// Commit all files in the request as a single commit on the target
    /// branch, returning the new commit SHA.
    fn commit_files(
        &self,
        token: &str,
        request: &GatewayCommitRequest,
    ) -> impl std::future::Future<Output = Result<GatewayCommit, GatewayError>> + Send;
}
