//! API routes and handlers.

mod scores;

use axum::{
    Router,
    routing::{get, post},
};

use super::state::AppState;

/// Build the API router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/courses/{course}/students/{student}/exam-scores",
            post(scores::score_exam_type),
        )
        .route(
            "/courses/{course}/students/{student}/total",
            post(scores::upsert_total)
                .put(scores::update_total)
                .get(scores::get_total),
        )
        .route(
            "/courses/{course}/students/{student}/summary",
            get(scores::get_summary),
        )
        .route(
            "/courses/{course}/students/{student}/recalculate",
            post(scores::recalculate_student),
        )
        .route(
            "/courses/{course}/recalculate",
            post(scores::recalculate_course),
        );

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}
