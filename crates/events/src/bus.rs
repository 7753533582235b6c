//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! Handlers publish and move on; nothing on the request path waits for a
//! subscriber. Share the bus as `Arc<EventBus>`.

use chrono::{DateTime, Utc};
use novaai_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Something that happened on the platform: a registration, a completed
/// lesson, a quiz submission, or a frontend analytics event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// Dot-separated name, e.g. `"lesson.completed"` or `"client.page_view"`.
    pub event_type: String,
    /// Kind of entity the event concerns (`"lesson"`, `"course"`, ...).
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<DbId>,
    /// The learner who caused the event, if known.
    pub actor_user_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    /// An event with no source, actor, or payload.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Attach the actor only when one is known (anonymous client events).
    pub fn with_optional_actor(mut self, user_id: Option<DbId>) -> Self {
        self.actor_user_id = user_id;
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Buffered events per subscriber before the slowest one starts lagging.
const DEFAULT_CAPACITY: usize = 1024;

/// Fan-out hub for [`PlatformEvent`]s.
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// When `capacity` is exceeded the oldest buffered events are dropped and
    /// slow receivers see `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Returns how many received it;
    /// zero subscribers is not an error.
    pub fn publish(&self, event: PlatformEvent) -> usize {
        tracing::debug!(event_type = %event.event_type, actor = ?event.actor_user_id, "Publishing event");
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
