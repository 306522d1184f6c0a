pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::catalog::handlers as catalog;
use crate::history::handlers as history;
use crate::reports::handlers as reports;
use crate::reviews::handlers as reviews;
use crate::roadmap::handlers as roadmap;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog
        .route("/api/prompts", get(catalog::handle_list_prompts))
        .route("/api/prompts/search", get(catalog::handle_search))
        .route("/api/prompts/:id", get(catalog::handle_get_prompt))
        .route("/api/prompts/:id/render", post(catalog::handle_render_prompt))
        .route("/api/bundles", get(catalog::handle_list_bundles))
        .route("/api/bundles/:id", get(catalog::handle_get_bundle))
        .route("/api/categories", get(catalog::handle_categories))
        .route("/api/tags", get(catalog::handle_tags))
        // View history
        .route(
            "/api/history",
            get(history::handle_list_history)
                .post(history::handle_record_view)
                .delete(history::handle_clear_history),
        )
        // Roadmap
        .route("/api/roadmap", get(roadmap::handle_get_roadmap))
        .route(
            "/api/roadmap/features",
            get(roadmap::handle_list_features).post(roadmap::handle_submit_feature),
        )
        .route("/api/roadmap/features/:id", get(roadmap::handle_get_feature))
        .route(
            "/api/roadmap/features/:id/vote",
            post(roadmap::handle_vote).delete(roadmap::handle_unvote),
        )
        .route(
            "/api/roadmap/features/:id/comments",
            post(roadmap::handle_add_comment),
        )
        // Reviews
        .route(
            "/api/reviews",
            get(reviews::handle_list_reviews).post(reviews::handle_submit_review),
        )
        .route("/api/reviews/:id", delete(reviews::handle_delete_review))
        .route("/api/reviews/:id/vote", post(reviews::handle_vote_review))
        // Reports
        .route("/api/reports", post(reports::handle_submit_report))
        // Admin
        .route("/api/admin/reports", get(reports::handle_list_reports))
        .route("/api/admin/reports/:id", patch(reports::handle_review_report))
        .route(
            "/api/admin/roadmap/features/:id/status",
            patch(roadmap::handle_update_status),
        )
        .route(
            "/api/admin/roadmap/features/:id/comments",
            post(roadmap::handle_admin_comment),
        )
        .route(
            "/api/admin/tag-mappings",
            get(catalog::handle_get_tag_mappings).put(catalog::handle_replace_tag_mappings),
        )
        .route(
            "/api/admin/tag-mappings/:alias",
            delete(catalog::handle_delete_tag_mapping),
        )
        .with_state(state)
}
