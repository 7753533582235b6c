//! Client analytics events.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use novaai_core::error::CoreError;
use novaai_core::event_names::client_event;
use novaai_core::types::Timestamp;
use novaai_core::validation::validate_event_type;
use novaai_events::PlatformEvent;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeAuthUser;
use crate::state::AppState;

/// Largest accepted payload, measured as serialized JSON.
const MAX_PAYLOAD_BYTES: usize = 16 * 1024;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientEventRequest {
    pub event_type: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReceipt {
    pub success: bool,
    pub received: bool,
    /// Stored name, i.e. the submitted type with the `client.` prefix.
    pub event_type: String,
    pub received_at: Timestamp,
}

/// POST /api/events
///
/// Accepted for asynchronous persistence; answers 202 before the write.
pub async fn log_event(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Json(input): Json<ClientEventRequest>,
) -> AppResult<(StatusCode, Json<EventReceipt>)> {
    let name = input.event_type.trim();
    validate_event_type(name)?;

    let payload = match input.payload {
        serde_json::Value::Null => serde_json::json!({}),
        other => other,
    };
    let size = serde_json::to_vec(&payload)
        .map_err(|e| AppError::InternalError(format!("Payload serialization error: {e}")))?
        .len();
    if size > MAX_PAYLOAD_BYTES {
        return Err(AppError::Core(CoreError::Validation(format!(
            "payload must be at most {MAX_PAYLOAD_BYTES} bytes"
        ))));
    }

    let event_type = client_event(name);
    let received_at = Utc::now();
    let mut event = PlatformEvent::new(event_type.clone())
        .with_optional_actor(viewer.user_id())
        .with_payload(payload);
    event.timestamp = received_at;
    state.event_bus.publish(event);

    Ok((
        StatusCode::ACCEPTED,
        Json(EventReceipt {
            success: true,
            received: true,
            event_type,
            received_at,
        }),
    ))
}
