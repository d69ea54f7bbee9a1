//! Draft pipeline handlers for the REST API.

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use pairforge_types::conversation::ConversationId;
use pairforge_types::draft::{Draft, DraftId, DraftStatus, SubmitDraftRequest};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for the draft list endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct DraftListQuery {
    /// Filter by status (pending, approved, rejected, promoted).
    pub status: Option<String>,
}

/// POST /api/v1/conversations/:id/drafts - Submit AI-generated content.
///
/// The returned draft carries its final status: content above the
/// auto-promotion threshold comes back already PROMOTED.
pub async fn submit_draft(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SubmitDraftRequest>,
) -> Result<Json<ApiResponse<Draft>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let conversation_id: ConversationId = id
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid conversation id: '{id}'")))?;
    if body.filename.trim().is_empty() {
        return Err(AppError::Validation("filename must not be blank".to_string()));
    }

    let draft = state.pipeline.submit(&conversation_id, &body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let self_link = format!("/api/v1/drafts/{}", draft.id);
    let resp = ApiResponse::success(draft, request_id, elapsed)
        .with_link("self", &self_link)
        .with_link(
            "drafts",
            &format!("/api/v1/conversations/{conversation_id}/drafts"),
        );

    Ok(Json(resp))
}

/// GET /api/v1/conversations/:id/drafts - List drafts, newest first.
pub async fn list_drafts(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DraftListQuery>,
) -> Result<Json<ApiResponse<Vec<Draft>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let conversation_id: ConversationId = id
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid conversation id: '{id}'")))?;

    let status_filter = match &query.status {
        Some(s) => Some(s.parse::<DraftStatus>().map_err(AppError::Validation)?),
        None => None,
    };

    let drafts = state
        .pipeline
        .list_drafts(&conversation_id, status_filter)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(drafts, request_id, elapsed).with_link(
        "self",
        &format!("/api/v1/conversations/{conversation_id}/drafts"),
    );

    Ok(Json(resp))
}

/// GET /api/v1/drafts/:id - Full draft detail including content.
pub async fn get_draft(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Draft>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let draft_id: DraftId = id
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid draft id: '{id}'")))?;

    let draft = state.pipeline.get_draft(&draft_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let conversation_link = format!(
        "/api/v1/conversations/{}/drafts",
        draft.conversation_id
    );
    let resp = ApiResponse::success(draft, request_id, elapsed)
        .with_link("self", &format!("/api/v1/drafts/{id}"))
        .with_link("drafts", &conversation_link);

    Ok(Json(resp))
}

/// POST /api/v1/drafts/:id/approve - Approve a pending draft.
pub async fn approve_draft(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Draft>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let draft_id: DraftId = id
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid draft id: '{id}'")))?;

    let draft = state.pipeline.approve(&draft_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(draft, request_id, elapsed)
        .with_link("self", &format!("/api/v1/drafts/{id}"))
        .with_link("promote", &format!("/api/v1/drafts/{id}/promote"));

    Ok(Json(resp))
}

/// POST /api/v1/drafts/:id/reject - Reject a pending draft.
pub async fn reject_draft(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Draft>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let draft_id: DraftId = id
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid draft id: '{id}'")))?;

    let draft = state.pipeline.reject(&draft_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(draft, request_id, elapsed)
        .with_link("self", &format!("/api/v1/drafts/{id}"));

    Ok(Json(resp))
}

/// POST /api/v1/drafts/:id/promote - Promote an approved draft.
pub async fn promote_draft(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Draft>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let draft_id: DraftId = id
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid draft id: '{id}'")))?;

    let draft = state.pipeline.promote_approved(&draft_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let history_link = format!(
        "/api/v1/conversations/{}/files/{}/history",
        draft.conversation_id, draft.filename
    );
    let resp = ApiResponse::success(draft, request_id, elapsed)
        .with_link("self", &format!("/api/v1/drafts/{id}"))
        .with_link("history", &history_link);

    Ok(Json(resp))
}
