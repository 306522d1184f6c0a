use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use crate::admin::AdminAuth;
use crate::errors::AppError;
use crate::extract::{Json, Path, Query};
use crate::reports::models::{
    ContentType, Report, ReportDecision, ReportFilter, ReportInput, ReportQueue, ReportStatus,
    DEFAULT_REPORT_LIMIT,
};
use crate::response::{data, ApiResult, Data};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReportsParams {
    pub status: Option<ReportStatus>,
    pub content_type: Option<ContentType>,
    pub limit: Option<usize>,
}

/// POST /api/reports
pub async fn handle_submit_report(
    State(state): State<AppState>,
    Json(input): Json<ReportInput>,
) -> Result<(StatusCode, Json<Data<Report>>), AppError> {
    input.validate().map_err(AppError::Validation)?;
    let now = state.clock.now();
    let report = state.reports.write().await.submit_report(input, now)?;
    Ok((StatusCode::CREATED, data(report)))
}

/// GET /api/admin/reports
pub async fn handle_list_reports(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Query(params): Query<ListReportsParams>,
) -> ApiResult<ReportQueue> {
    let filter = ReportFilter {
        status: params.status,
        content_type: params.content_type,
        limit: params.limit.unwrap_or(DEFAULT_REPORT_LIMIT),
    };
    Ok(data(state.reports.read().await.list_reports(&filter)))
}

/// PATCH /api/admin/reports/:id
pub async fn handle_review_report(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(decision): Json<ReportDecision>,
) -> ApiResult<Report> {
    if decision.reviewed_by.trim().is_empty() {
        return Err(AppError::Validation("reviewedBy is required".to_string()));
    }
    let now = state.clock.now();
    state
        .reports
        .write()
        .await
        .review_report(id, decision, now)?
        .map(data)
        .ok_or_else(|| AppError::NotFound(format!("Report {id} not found")))
}
