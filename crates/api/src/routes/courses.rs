use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{courses, lessons};
use crate::state::AppState;

/// Catalog routes. Module lesson creation lives here because modules have no
/// router of their own.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/courses",
            get(courses::list_courses).post(courses::create_course),
        )
        .route("/courses/{id}", get(courses::get_course))
        .route("/courses/{id}/modules", post(courses::create_module))
        .route("/modules/{id}/lessons", post(lessons::create_lesson))
}
