//! File version ledger handlers for the REST API.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;

use pairforge_types::conversation::ConversationId;
use pairforge_types::version::{FileVersion, RecordFileRequest};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/conversations/:id/files - Record a file's original version.
pub async fn record_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RecordFileRequest>,
) -> Result<Json<ApiResponse<FileVersion>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let conversation_id: ConversationId = id
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid conversation id: '{id}'")))?;
    if body.filename.trim().is_empty() {
        return Err(AppError::Validation("filename must not be blank".to_string()));
    }

    let version = state.ledger.import_file(&conversation_id, &body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let history_link = format!(
        "/api/v1/conversations/{conversation_id}/files/{}/history",
        version.filename
    );
    let resp = ApiResponse::success(version, request_id, elapsed)
        .with_link("files", &format!("/api/v1/conversations/{conversation_id}/files"))
        .with_link("history", &history_link);

    Ok(Json(resp))
}

/// GET /api/v1/conversations/:id/files - Current latest snapshot, one entry
/// per file that has an active latest version.
pub async fn get_snapshot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<FileVersion>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let conversation_id: ConversationId = id
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid conversation id: '{id}'")))?;

    let snapshot = state.ledger.snapshot(&conversation_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(snapshot, request_id, elapsed)
        .with_link("self", &format!("/api/v1/conversations/{conversation_id}/files"))
        .with_link(
            "commit",
            &format!("/api/v1/conversations/{conversation_id}/commit"),
        );

    Ok(Json(resp))
}

/// GET /api/v1/conversations/:id/files/:filename/history - Version history.
///
/// Filenames with directory separators must be URL-encoded (`%2F`).
pub async fn get_history(
    State(state): State<AppState>,
    Path((id, filename)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Vec<FileVersion>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let conversation_id: ConversationId = id
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid conversation id: '{id}'")))?;

    let history = state.ledger.file_history(&conversation_id, &filename).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(history, request_id, elapsed).with_link(
        "files",
        &format!("/api/v1/conversations/{conversation_id}/files"),
    );

    Ok(Json(resp))
}
