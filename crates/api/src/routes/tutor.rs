use axum::routing::post;
use axum::Router;

use crate::handlers::tutor;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/chat", post(tutor::chat))
}
