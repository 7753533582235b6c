pub mod auth;
pub mod courses;
pub mod events;
pub mod health;
pub mod lessons;
pub mod recommendations;
pub mod skills;
pub mod tutor;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /auth/register                     register (public)
/// /auth/login                        login (public)
/// /auth/me                           current user
/// /auth/logout                       revoke current session
///
/// /courses                           list (public), create (author)
/// /courses/{id}                      course with modules and lessons
/// /courses/{id}/modules              append module (author)
/// /modules/{id}/lessons              append lesson (author)
///
/// /lessons/{id}                      lesson
/// /lessons/{id}/complete             mark complete, award skill gain once
/// /lessons/{id}/quiz                 questions (public), submit answers
/// /lessons/{id}/questions            add question (author)
///
/// /skills                            Skills DNA + summary
/// /skills/goals                      goals with projections
/// /skills/goals/{name}               upsert, delete goal
/// /skills/{name}                     set progress
/// /skills/{name}/progress            add delta
/// /skills/{name}/history             progress samples
///
/// /recommendations                   ranked courses
/// /tutor/chat                        AI tutor (optional auth)
/// /events                            client analytics (optional auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(courses::router())
        .merge(lessons::router())
        .nest("/skills", skills::router())
        .nest("/recommendations", recommendations::router())
        .nest("/tutor", tutor::router())
        .nest("/events", events::router())
}
