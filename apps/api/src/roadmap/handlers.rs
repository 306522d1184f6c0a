//! Axum route handlers for the public roadmap and its admin controls.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::admin::AdminAuth;
use crate::errors::AppError;
use crate::extract::{Json, Path, Query};
use crate::response::{data, ApiResult, Data};
use crate::roadmap::models::{
    AddCommentInput, FeatureComment, FeatureRequest, FeatureSort, FeatureStatus,
    RoadmapByStatus, StatusUpdate, SubmitFeatureInput,
};
use crate::roadmap::store::VoteError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFeaturesParams {
    pub status: Option<FeatureStatus>,
    #[serde(default)]
    pub sort: FeatureSort,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerParams {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDetail {
    pub feature: FeatureRequest,
    pub comments: Vec<FeatureComment>,
    pub has_voted: bool,
}

/// Vote endpoints answer with this shape on success and on refusal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<u32>,
}

impl From<Result<u32, VoteError>> for VoteOutcome {
    fn from(result: Result<u32, VoteError>) -> Self {
        match result {
            Ok(count) => VoteOutcome {
                success: true,
                error: None,
                vote_count: Some(count),
            },
            Err(e) => VoteOutcome {
                success: false,
                error: Some(e.to_string()),
                vote_count: None,
            },
        }
    }
}

fn vote_response(result: Result<u32, VoteError>) -> Response {
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(VoteError::FeatureNotFound) => StatusCode::NOT_FOUND,
        Err(VoteError::AlreadyVoted | VoteError::NotVoted) => StatusCode::CONFLICT,
    };
    (status, Json(VoteOutcome::from(result))).into_response()
}

fn validate_comment(input: &AddCommentInput) -> Result<(), AppError> {
    if input.user_id.trim().is_empty() {
        return Err(AppError::Validation("userId is required".to_string()));
    }
    let len = input.content.trim().chars().count();
    if len == 0 || len > 2000 {
        return Err(AppError::Validation(
            "content must be between 1 and 2000 characters".to_string(),
        ));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/roadmap
pub async fn handle_get_roadmap(State(state): State<AppState>) -> ApiResult<RoadmapByStatus> {
    Ok(data(state.roadmap.read().await.get_roadmap_by_status()))
}

/// GET /api/roadmap/features
pub async fn handle_list_features(
    State(state): State<AppState>,
    Query(params): Query<ListFeaturesParams>,
) -> ApiResult<Vec<FeatureRequest>> {
    let features = state
        .roadmap
        .read()
        .await
        .list_features(params.status, params.sort);
    Ok(data(features))
}

/// POST /api/roadmap/features
pub async fn handle_submit_feature(
    State(state): State<AppState>,
    Json(input): Json<SubmitFeatureInput>,
) -> Result<(StatusCode, Json<Data<FeatureRequest>>), AppError> {
    input.validate().map_err(AppError::Validation)?;
    let now = state.clock.now();
    let feature = state.roadmap.write().await.submit_feature(input, now);
    Ok((StatusCode::CREATED, data(feature)))
}

/// GET /api/roadmap/features/:id
pub async fn handle_get_feature(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ViewerParams>,
) -> ApiResult<FeatureDetail> {
    let roadmap = state.roadmap.read().await;
    let feature = roadmap
        .get_feature(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Feature {id} not found")))?;
    let has_voted = params
        .user_id
        .as_deref()
        .is_some_and(|user| roadmap.has_user_voted(id, user));
    Ok(data(FeatureDetail {
        comments: roadmap.get_comments(id),
        feature,
        has_voted,
    }))
}

/// POST /api/roadmap/features/:id/vote
pub async fn handle_vote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<VoteRequest>,
) -> Result<Response, AppError> {
    if req.user_id.trim().is_empty() {
        return Err(AppError::Validation("userId is required".to_string()));
    }
    let now = state.clock.now();
    let result = state
        .roadmap
        .write()
        .await
        .vote_for_feature(id, &req.user_id, now);
    Ok(vote_response(result))
}

/// DELETE /api/roadmap/features/:id/vote
pub async fn handle_unvote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<VoteRequest>,
) -> Result<Response, AppError> {
    if req.user_id.trim().is_empty() {
        return Err(AppError::Validation("userId is required".to_string()));
    }
    let result = state.roadmap.write().await.unvote_feature(id, &req.user_id);
    Ok(vote_response(result))
}

/// POST /api/roadmap/features/:id/comments
pub async fn handle_add_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut input): Json<AddCommentInput>,
) -> Result<(StatusCode, Json<Data<FeatureComment>>), AppError> {
    validate_comment(&input)?;
    input.is_official = false;
    add_comment(&state, id, input).await
}

/// POST /api/admin/roadmap/features/:id/comments
pub async fn handle_admin_comment(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<AddCommentInput>,
) -> Result<(StatusCode, Json<Data<FeatureComment>>), AppError> {
    validate_comment(&input)?;
    add_comment(&state, id, input).await
}

async fn add_comment(
    state: &AppState,
    id: Uuid,
    input: AddCommentInput,
) -> Result<(StatusCode, Json<Data<FeatureComment>>), AppError> {
    let now = state.clock.now();
    let comment = state
        .roadmap
        .write()
        .await
        .add_comment(id, input, now)
        .ok_or_else(|| AppError::NotFound(format!("Feature {id} not found")))?;
    Ok((StatusCode::CREATED, data(comment)))
}

/// PATCH /api/admin/roadmap/features/:id/status
pub async fn handle_update_status(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<StatusUpdate>,
) -> ApiResult<FeatureRequest> {
    let now = state.clock.now();
    let feature = state
        .roadmap
        .write()
        .await
        .update_feature_status(id, update, now)
        .ok_or_else(|| AppError::NotFound(format!("Feature {id} not found")))?;
    info!("Admin moved feature {id} to {:?}", feature.status);
    Ok(data(feature))
}
