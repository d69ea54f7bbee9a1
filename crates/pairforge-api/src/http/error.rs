//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use pairforge_types::error::{CommitError, DraftError, GatewayError, LedgerError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Draft pipeline errors.
    Draft(DraftError),
    /// Version ledger errors.
    Ledger(LedgerError),
    /// Commit orchestration errors.
    Commit(CommitError),
    /// Validation error (malformed ids, bad query parameters).
    Validation(String),
}

impl From<DraftError> for AppError {
    fn from(e: DraftError) -> Self {
        // A promotion that loses the version race surfaces the ledger
        // failure directly, not wrapped in a draft error.
        match e {
            DraftError::Ledger(inner) => AppError::Ledger(inner),
            other => AppError::Draft(other),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(e: LedgerError) -> Self {
        AppError::Ledger(e)
    }
}

impl From<CommitError> for AppError {
    fn from(e: CommitError) -> Self {
        AppError::Commit(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            AppError::Draft(DraftError::NotFound) => (
                StatusCode::NOT_FOUND,
                "DRAFT_NOT_FOUND",
                "Draft not found".to_string(),
                None,
            ),
            AppError::Draft(DraftError::EmptyContent) => (
                StatusCode::BAD_REQUEST,
                "EMPTY_CONTENT",
                "Draft content is empty".to_string(),
                None,
            ),
            AppError::Draft(e @ DraftError::InvalidState { .. }) => {
                (StatusCode::CONFLICT, "INVALID_STATE", e.to_string(), None)
            }
            AppError::Draft(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DRAFT_ERROR",
                e.to_string(),
                None,
            ),
            AppError::Ledger(LedgerError::DuplicateFile(filename)) => (
                StatusCode::CONFLICT,
                "DUPLICATE_FILE",
                format!("File '{filename}' already has a recorded version"),
                None,
            ),
            AppError::Ledger(e @ LedgerError::Conflict(_)) => {
                (StatusCode::CONFLICT, "VERSION_CONFLICT", e.to_string(), None)
            }
            AppError::Ledger(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "LEDGER_ERROR",
                e.to_string(),
                None,
            ),
            AppError::Commit(CommitError::NothingToCommit) => (
                StatusCode::BAD_REQUEST,
                "NOTHING_TO_COMMIT",
                "No files to commit".to_string(),
                None,
            ),
            AppError::Commit(CommitError::UnsafeCommit { filenames }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNSAFE_COMMIT",
                "Files below the completeness floor".to_string(),
                Some(json!({ "filenames": filenames })),
            ),
            AppError::Commit(CommitError::NoCredentials) => (
                StatusCode::UNAUTHORIZED,
                "NO_CREDENTIALS",
                "No GitHub credentials available".to_string(),
                None,
            ),
            AppError::Commit(e @ CommitError::Failed(GatewayError::Timeout(_))) => (
                StatusCode::GATEWAY_TIMEOUT,
                "GATEWAY_TIMEOUT",
                e.to_string(),
                None,
            ),
            AppError::Commit(e @ CommitError::Failed(GatewayError::RateLimited { .. })) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "GATEWAY_RATE_LIMITED",
                e.to_string(),
                None,
            ),
            AppError::Commit(e @ CommitError::Failed(_)) => {
                (StatusCode::BAD_GATEWAY, "GATEWAY_ERROR", e.to_string(), None)
            }
            AppError::Commit(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "COMMIT_ERROR",
                e.to_string(),
                None,
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
            }
        };

        let mut error_obj = json!({
            "code": code,
            "message": message,
        });
        if let Some(details) = details {
            error_obj["details"] = details;
        }

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [error_obj]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
