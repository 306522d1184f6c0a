use std::collections::BTreeMap;

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::admin::AdminAuth;
use crate::catalog::bundles::{BundleDetail, BundleSummary};
use crate::catalog::models::{NameCount, Prompt, PromptFilter, PromptSummary};
use crate::catalog::render::{render_prompt, RenderRequest, RenderedPrompt};
use crate::catalog::search::{SearchResult, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use crate::catalog::tag_mappings::{normalize_tag, TagMappings};
use crate::errors::AppError;
use crate::extract::{Json, Path, Query};
use crate::response::{data, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPromptsParams {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceTagMappings {
    pub mappings: BTreeMap<String, String>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
}

/// GET /api/prompts
pub async fn handle_list_prompts(
    State(state): State<AppState>,
    Query(params): Query<ListPromptsParams>,
) -> ApiResult<Vec<PromptSummary>> {
    let filter = PromptFilter {
        category: params.category,
        tag: params.tag,
        featured: params.featured,
    };
    let tags = state.tag_mappings.read().await;
    Ok(data(state.catalog.list_prompts(&filter, &tags)))
}

/// GET /api/prompts/:id
pub async fn handle_get_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Prompt> {
    state
        .catalog
        .get_prompt(&id)
        .cloned()
        .map(data)
        .ok_or_else(|| AppError::NotFound(format!("Prompt {id} not found")))
}

/// POST /api/prompts/:id/render
pub async fn handle_render_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RenderRequest>,
) -> ApiResult<RenderedPrompt> {
    let prompt = state
        .catalog
        .get_prompt(&id)
        .ok_or_else(|| AppError::NotFound(format!("Prompt {id} not found")))?;
    Ok(data(render_prompt(prompt, &req.variables)?))
}

/// GET /api/bundles
pub async fn handle_list_bundles(State(state): State<AppState>) -> ApiResult<Vec<BundleSummary>> {
    Ok(data(state.catalog.list_bundles()))
}

/// GET /api/bundles/:id
pub async fn handle_get_bundle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<BundleDetail> {
    state
        .catalog
        .get_bundle(&id)
        .map(data)
        .ok_or_else(|| AppError::NotFound(format!("Bundle {id} not found")))
}

/// GET /api/prompts/search
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<SearchResponse> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .min(MAX_SEARCH_LIMIT);
    let tags = state.tag_mappings.read().await;
    let results = state.catalog.search(&params.q, limit, &tags);
    Ok(data(SearchResponse {
        query: params.q,
        results,
    }))
}

/// GET /api/categories
pub async fn handle_categories(State(state): State<AppState>) -> ApiResult<Vec<NameCount>> {
    Ok(data(state.catalog.category_counts()))
}

/// GET /api/tags
pub async fn handle_tags(State(state): State<AppState>) -> ApiResult<Vec<NameCount>> {
    let tags = state.tag_mappings.read().await;
    Ok(data(state.catalog.tag_counts(&tags)))
}

/// GET /api/admin/tag-mappings
pub async fn handle_get_tag_mappings(
    _admin: AdminAuth,
    State(state): State<AppState>,
) -> ApiResult<TagMappings> {
    Ok(data(state.tag_mappings.read().await.clone()))
}

/// PUT /api/admin/tag-mappings
pub async fn handle_replace_tag_mappings(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Json(req): Json<ReplaceTagMappings>,
) -> ApiResult<TagMappings> {
    let mappings = TagMappings::validated(req.mappings).map_err(AppError::Validation)?;
    let next = TagMappings {
        mappings,
        updated_at: Some(state.clock.now()),
        updated_by: req.updated_by,
    };

    let mut current = state.tag_mappings.write().await;
    next.save(&state.config.tag_mappings_path).await?;
    *current = next.clone();
    info!("Tag mappings replaced ({} entries)", next.mappings.len());
    Ok(data(next))
}

/// DELETE /api/admin/tag-mappings/:alias
pub async fn handle_delete_tag_mapping(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(alias): Path<String>,
) -> ApiResult<TagMappings> {
    let alias = normalize_tag(&alias);
    let mut current = state.tag_mappings.write().await;
    if !current.mappings.contains_key(&alias) {
        return Err(AppError::NotFound(format!("No mapping for tag '{alias}'")));
    }

    let mut next = current.clone();
    next.mappings.remove(&alias);
    next.updated_at = Some(state.clock.now());
    next.save(&state.config.tag_mappings_path).await?;
    *current = next.clone();
    info!("Tag mapping '{alias}' removed");
    Ok(data(next))
}
