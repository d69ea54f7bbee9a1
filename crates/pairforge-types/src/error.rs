use thiserror::Error;

/// Errors related to draft submission and review.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("draft not found")]
    NotFound,

    #[error("draft content is empty")]
    EmptyContent,

    #[error("invalid draft state: cannot {action} a draft with status '{status}'")]
    InvalidState { action: String, status: String },

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to the file version ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("file '{0}' already has a recorded version")]
    DuplicateFile(String),

    #[error("version conflict for '{0}'")]
    Conflict(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to committing a conversation snapshot.
#[derive(Debug, Error)]
pub enum CommitError {
    #[error("no files to commit")]
    NothingToCommit,

    #[error("unsafe to commit, files below the completeness floor: {}", .filenames.join(", "))]
    UnsafeCommit { filenames: Vec<String> },

    #[error("no GitHub credentials available")]
    NoCredentials,

    #[error("commit failed: {0}")]
    Failed(#[from] GatewayError),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from the remote repository gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("reference update conflict: {0}")]
    RefConflict(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("network error: {0}")]
    Network(String),

    #[error("operation timed out after {0}s")]
    Timeout(u64),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Errors from storage operations (used by trait definitions in pairforge-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}
