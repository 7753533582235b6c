use std::sync::Arc;

use novaai_events::EventBus;
use novaai_tutor::Tutor;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything inside is behind an `Arc` or is a pool handle.
#[derive(Clone)]
pub struct AppState {
    pub pool: novaai_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Learning-activity events; persisted by a background subscriber.
    pub event_bus: Arc<EventBus>,
    pub tutor: Tutor,
}
