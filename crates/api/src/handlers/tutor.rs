//! AI tutor chat.

use axum::extract::State;
use axum::Json;
use novaai_core::event_names;
use novaai_core::tutor::{validate_message, ChatTurn};
use novaai_db::repositories::SkillRepo;
use novaai_events::PlatformEvent;
use novaai_tutor::TutorReply;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::MaybeAuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Prior turns, oldest first. Only the most recent few are forwarded.
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// POST /api/tutor/chat
///
/// Works anonymously; a logged-in learner gets answers steered toward their
/// weakest skills. Never fails because the language model is unavailable.
pub async fn chat(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Json(input): Json<ChatRequest>,
) -> AppResult<Json<ApiResponse<TutorReply>>> {
    let message = validate_message(&input.message)?;

    let skills: Vec<(String, f64)> = match viewer.user_id() {
        Some(user_id) => SkillRepo::list_for_user(&state.pool, user_id)
            .await?
            .into_iter()
            .map(|s| (s.skill_name, s.progress))
            .collect(),
        None => Vec::new(),
    };

    let reply = state.tutor.reply(message, input.history, &skills).await;

    state.event_bus.publish(
        PlatformEvent::new(event_names::TUTOR_MESSAGE)
            .with_optional_actor(viewer.user_id())
            .with_payload(serde_json::json!({
                "source": reply.source,
                "messageChars": message.chars().count(),
            })),
    );

    Ok(Json(ApiResponse::ok(reply)))
}
