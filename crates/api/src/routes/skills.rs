use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{goals, skills};
use crate::state::AppState;

/// Routes mounted at `/skills`. The static `goals` segment wins over
/// `{name}`, so `normalize_skill_name` rejects "goals" as a skill name.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(skills::list_skills))
        .route("/goals", get(goals::list_goals))
        .route(
            "/goals/{name}",
            put(goals::upsert_goal).delete(goals::delete_goal),
        )
        .route("/{name}", put(skills::set_skill))
        .route("/{name}/progress", post(skills::add_progress))
        .route("/{name}/history", get(skills::skill_history))
}
