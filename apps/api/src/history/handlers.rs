use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::extract::{Json, Query};
use crate::history::models::{
    HistoryQuery, RecordViewInput, ResourceType, ViewHistoryEntry, DEFAULT_HISTORY_LIMIT,
    MAX_HISTORY_LIMIT,
};
use crate::response::{data, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListHistoryParams {
    pub user_id: String,
    pub resource_type: Option<ResourceType>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearHistoryParams {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearHistoryResponse {
    pub cleared: usize,
}

/// POST /api/history
pub async fn handle_record_view(
    State(state): State<AppState>,
    Json(input): Json<RecordViewInput>,
) -> ApiResult<ViewHistoryEntry> {
    input.validate().map_err(AppError::Validation)?;
    let now = state.clock.now();
    let entry = state.history.write().await.record_view(input, now);
    Ok(data(entry))
}

/// GET /api/history
pub async fn handle_list_history(
    State(state): State<AppState>,
    Query(params): Query<ListHistoryParams>,
) -> ApiResult<Vec<ViewHistoryEntry>> {
    if params.user_id.trim().is_empty() {
        return Err(AppError::Validation("userId is required".to_string()));
    }
    let query = HistoryQuery {
        user_id: params.user_id,
        resource_type: params.resource_type,
        limit: params
            .limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .min(MAX_HISTORY_LIMIT),
    };
    let now = state.clock.now();
    let entries = state.history.write().await.list_history(&query, now);
    Ok(data(entries))
}

/// DELETE /api/history
pub async fn handle_clear_history(
    State(state): State<AppState>,
    Query(params): Query<ClearHistoryParams>,
) -> ApiResult<ClearHistoryResponse> {
    if params.user_id.trim().is_empty() {
        return Err(AppError::Validation("userId is required".to_string()));
    }
    let cleared = state.history.write().await.clear_history(&params.user_id);
    info!("Cleared {cleared} history entries for user {}", params.user_id);
    Ok(data(ClearHistoryResponse { cleared }))
}
