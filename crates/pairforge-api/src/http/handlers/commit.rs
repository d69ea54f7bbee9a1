//! Commit orchestration handlers for the REST API.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;

use pairforge_types::commit::{CommitRecord, CommitRequest};
use pairforge_types::conversation::ConversationId;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/conversations/:id/commit - Commit the current snapshot.
pub async fn commit_snapshot(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CommitRequest>,
) -> Result<Json<ApiResponse<CommitRecord>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let conversation_id: ConversationId = id
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid conversation id: '{id}'")))?;
    if !body.repository.trim().contains('/') {
        return Err(AppError::Validation(
            "repository must be in 'owner/name' form".to_string(),
        ));
    }
    if body.branch.trim().is_empty() {
        return Err(AppError::Validation("branch must not be blank".to_string()));
    }

    let record = state
        .orchestrator
        .commit_snapshot(&conversation_id, &body)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(record, request_id, elapsed).with_link(
        "commits",
        &format!("/api/v1/conversations/{conversation_id}/commits"),
    );

    Ok(Json(resp))
}

/// GET /api/v1/conversations/:id/commits - Commit audit history, newest first.
pub async fn list_commits(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<CommitRecord>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let conversation_id: ConversationId = id
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid conversation id: '{id}'")))?;

    let commits = state.orchestrator.commit_history(&conversation_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(commits, request_id, elapsed).with_link(
        "self",
        &format!("/api/v1/conversations/{conversation_id}/commits"),
    );

    Ok(Json(resp))
}
