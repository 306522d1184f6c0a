use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{Json, Path, Query};
use crate::response::{data, ApiResult};
use crate::reviews::models::{
    RatingSummary, Review, ReviewInput, ReviewSort, DEFAULT_REVIEW_LIMIT, MAX_REVIEW_LIMIT,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReviewsParams {
    pub prompt_id: String,
    #[serde(default)]
    pub sort: ReviewSort,
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorParams {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewVoteRequest {
    pub user_id: String,
    pub helpful: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListResponse {
    pub reviews: Vec<Review>,
    pub summary: RatingSummary,
}

/// GET /api/reviews
pub async fn handle_list_reviews(
    State(state): State<AppState>,
    Query(params): Query<ListReviewsParams>,
) -> ApiResult<ReviewListResponse> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_REVIEW_LIMIT)
        .min(MAX_REVIEW_LIMIT);
    let store = state.reviews.read().await;
    Ok(data(ReviewListResponse {
        reviews: store.list_reviews(&params.prompt_id, params.sort, limit, params.offset),
        summary: store.summary(&params.prompt_id),
    }))
}

/// POST /api/reviews
///
/// Creates the caller's review of a prompt, or replaces their earlier one.
pub async fn handle_submit_review(
    State(state): State<AppState>,
    Json(input): Json<ReviewInput>,
) -> ApiResult<Review> {
    input.validate().map_err(AppError::Validation)?;
    if !state.catalog.contains(&input.prompt_id) {
        return Err(AppError::NotFound(format!(
            "Prompt {} not found",
            input.prompt_id
        )));
    }
    let now = state.clock.now();
    let review = state.reviews.write().await.upsert_review(input, now);
    Ok(data(review))
}

/// DELETE /api/reviews/:id
pub async fn handle_delete_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<AuthorParams>,
) -> Result<StatusCode, AppError> {
    state
        .reviews
        .write()
        .await
        .delete_review(id, &params.user_id)?;
    info!("Review {id} deleted by its author");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/reviews/:id/vote
pub async fn handle_vote_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReviewVoteRequest>,
) -> ApiResult<Review> {
    if req.user_id.trim().is_empty() {
        return Err(AppError::Validation("userId is required".to_string()));
    }
    let review = state
        .reviews
        .write()
        .await
        .vote_review(id, &req.user_id, req.helpful)?;
    Ok(data(review))
}
