use axum::routing::get;
use axum::Router;

use crate::handlers::recommendations;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(recommendations::recommend))
}
