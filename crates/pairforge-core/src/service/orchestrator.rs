//! Commit orchestration: snapshot, safety checks, push, record.

use std::time::Duration;

use chrono::Utc;
use pairforge_types::commit::{CommitRecord, CommitRecordId, CommitRequest};
use pairforge_types::conversation::ConversationId;
use pairforge_types::error::{CommitError, GatewayError};
use pairforge_types::gateway::{CommitFile, GatewayCommitRequest};
use pairforge_types::validation::ValidationPolicy;
use tracing::{info, warn};

use crate::gateway::RepositoryGateway;
use crate::store::commit::CommitLog;
use crate::store::ledger::VersionLedger;
use crate::token::TokenChain;
use crate::validator::CompletenessValidator;

/// Pushes a conversation's latest file versions to a remote repository.
///
/// The orchestrator never partially commits: every file is re-validated
/// against the completeness floor before the gateway is called, and the
/// gateway itself applies all files in one commit. A `CommitRecord` exists
/// only for commits that actually landed.
pub struct CommitOrchestrator<L, C, G> {
    ledger: L,
    commits: C,
    gateway: G,
    tokens: TokenChain,
    validator: CompletenessValidator,
}

impl<L, C, G> CommitOrchestrator<L, C, G>
where
    L: VersionLedger,
    C: CommitLog,
    G: RepositoryGateway,
{
    pub fn new(
        ledger: L,
        commits: C,
        gateway: G,
        tokens: TokenChain,
        policy: ValidationPolicy,
    ) -> Self {
        Self {
            ledger,
            commits,
            gateway,
            tokens,
            validator: CompletenessValidator::new(policy),
        }
    }

    /// Commit the latest version of every tracked file in one atomic commit.
    ///
    /// Fails fast without touching the remote when there is nothing to
    /// commit, when any file falls below the completeness floor, or when no
    /// access token can be resolved.
    pub async fn commit_snapshot(
        &self,
        conversation_id: &ConversationId,
        request: &CommitRequest,
    ) -> Result<CommitRecord, CommitError> {
        let snapshot = self
            .ledger
            .latest_snapshot(conversation_id)
            .await
            .map_err(|e| CommitError::StorageError(e.to_string()))?;
        if snapshot.is_empty() {
            return Err(CommitError::NothingToCommit);
        }

        // Promotion already validated this content, but the floor is cheap
        // and the remote push is not undoable.
        let floor = self.validator.policy().commit_floor;
        let flagged: Vec<String> = snapshot
            .iter()
            .filter(|file| self.validator.score(&file.filename, &file.content).score < floor)
            .map(|file| file.filename.clone())
            .collect();
        if !flagged.is_empty() {
            warn!(
                conversation_id = %conversation_id,
                files = flagged.len(),
                "Commit blocked by completeness floor"
            );
            return Err(CommitError::UnsafeCommit { filenames: flagged });
        }

        let token = match &request.token {
            Some(token) if !token.trim().is_empty() => token.clone(),
            _ => self
                .tokens
                .resolve()
                .await
                .map_err(|e| CommitError::StorageError(e.to_string()))?
                .ok_or(CommitError::NoCredentials)?,
        };

        let message = request
            .message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Update {} file(s) from Pairforge", snapshot.len()));

        let gateway_request = GatewayCommitRequest {
            repository: request.repository.clone(),
            branch: request.branch.clone(),
            base_path: request.base_path.clone(),
            message: message.clone(),
            files: snapshot
                .iter()
                .map(|v| CommitFile {
                    path: v.filename.clone(),
                    content: v.content.clone(),
                })
                .collect(),
        };

        let commit = match request.timeout_secs {
            Some(secs) => {
                let call = self.gateway.commit_files(&token, &gateway_request);
                match tokio::time::timeout(Duration::from_secs(secs), call).await {
                    Ok(result) => result?,
                    Err(_) => return Err(CommitError::Failed(GatewayError::Timeout(secs))),
                }
            }
            None => self.gateway.commit_files(&token, &gateway_request).await?,
        };

        let record = CommitRecord {
            id: CommitRecordId::new(),
            conversation_id: conversation_id.clone(),
            repository: request.repository.clone(),
            branch: commit.branch.clone(),
            base_path: request.base_path.clone(),
            message,
            commit_sha: commit.sha.clone(),
            file_count: snapshot.len() as i64,
            filenames: snapshot.iter().map(|v| v.filename.clone()).collect(),
            committed_at: Utc::now(),
        };
        let record = self
            .commits
            .record(&record)
            .await
            .map_err(|e| CommitError::StorageError(e.to_string()))?;

        info!(
            conversation_id = %conversation_id,
            sha = %record.commit_sha,
            branch = %record.branch,
            branch_created = commit.branch_created,
            files = record.file_count,
            "Committed conversation snapshot"
        );
        Ok(record)
    }

    /// Commit history for a conversation, newest first.
    pub async fn commit_history(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<CommitRecord>, CommitError> {
        self.commits
            .list(conversation_id)
            .await
            .map_err(|e| CommitError::StorageError(e.to_string()))
    }
}
