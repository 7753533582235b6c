use axum::routing::{get, post};
use axum::Router;

use crate::handlers::lessons;
use crate::state::AppState;

/// ```text
/// GET  /lessons/{id}           -> get_lesson
/// POST /lessons/{id}/complete  -> complete_lesson
/// GET  /lessons/{id}/quiz      -> get_quiz
/// POST /lessons/{id}/quiz      -> submit_quiz
/// POST /lessons/{id}/questions -> create_question
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lessons/{id}", get(lessons::get_lesson))
        .route("/lessons/{id}/complete", post(lessons::complete_lesson))
        .route(
            "/lessons/{id}/quiz",
            get(lessons::get_quiz).post(lessons::submit_quiz),
        )
        .route("/lessons/{id}/questions", post(lessons::create_question))
}
