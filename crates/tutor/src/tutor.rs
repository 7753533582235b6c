//! Tutor facade with canned-reply fallback.

use std::sync::Arc;

use novaai_core::tutor::{build_system_prompt, canned_reply, trim_history, ChatTurn};
use serde::Serialize;

use crate::client::{ChatMessage, CompletionRequest, OpenAiClient, TutorBackend};
use crate::config::TutorConfig;

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Llm,
    Canned,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TutorReply {
    pub reply: String,
    pub source: ReplySource,
}

/// Answers learner questions. Cheap to clone.
#[derive(Clone)]
pub struct Tutor {
    backend: Option<Arc<dyn TutorBackend>>,
}

impl Tutor {
    /// Build from config. Without an API key, or if the HTTP client cannot be
    /// built, the tutor runs offline.
    pub fn from_config(config: &TutorConfig) -> Self {
        let Some(key) = config.api_key.as_deref() else {
            tracing::info!("No TUTOR_API_KEY set, tutor will use canned replies");
            return Self::offline();
        };
        match OpenAiClient::new(config, key) {
            Ok(client) => {
                tracing::info!(model = %config.model, url = %config.api_url, "Tutor language model configured");
                Self::with_backend(Arc::new(client))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build tutor HTTP client, using canned replies");
                Self::offline()
            }
        }
    }

    pub fn with_backend(backend: Arc<dyn TutorBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn offline() -> Self {
        Self { backend: None }
    }

    pub fn is_online(&self) -> bool {
        self.backend.is_some()
    }

    /// Answer `message` given prior `history` and the learner's skills as
    /// `(name, progress)` pairs. `message` must already be validated.
    pub async fn reply(
        &self,
        message: &str,
        history: Vec<ChatTurn>,
        skills: &[(String, f64)],
    ) -> TutorReply {
        let Some(backend) = &self.backend else {
            return Self::canned(message);
        };

        let request = build_request(message, history, skills);
        match backend.complete(&request).await {
            Ok(reply) => TutorReply {
                reply,
                source: ReplySource::Llm,
            },
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    model = backend.model(),
                    "Tutor model call failed, falling back to canned reply"
                );
                Self::canned(message)
            }
        }
    }

    fn canned(message: &str) -> TutorReply {
        TutorReply {
            reply: canned_reply(message).to_string(),
            source: ReplySource::Canned,
        }
    }
}

/// System prompt, trimmed history, then the new user message.
fn build_request(message: &str, history: Vec<ChatTurn>, skills: &[(String, f64)]) -> CompletionRequest {
    let history = trim_history(history);
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::new("system", build_system_prompt(skills)));
    messages.extend(
        history
            .into_iter()
            .map(|t| ChatMessage::new(t.role.as_str(), t.content)),
    );
    messages.push(ChatMessage::new("user", message));
    CompletionRequest { messages }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use novaai_core::tutor::{ChatRole, MAX_HISTORY_TURNS};

    use super::*;
    use crate::client::TutorError;

    /// Records the last request and answers with a fixed result.
    struct MockBackend {
        answer: Result<String, u16>,
        seen: Mutex<Option<CompletionRequest>>,
    }

    impl MockBackend {
        fn answering(reply: &str) -> Self {
            Self {
                answer: Ok(reply.into()),
                seen: Mutex::new(None),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                answer: Err(status),
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl TutorBackend for MockBackend {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, TutorError> {
            *self.seen.lock().unwrap() = Some(request.clone());
            match &self.answer {
                Ok(reply) => Ok(reply.clone()),
                Err(status) => Err(TutorError::Api {
                    status: *status,
                    body: "boom".into(),
                }),
            }
        }

        fn model(&self) -> &str {
            "mock"
        }
    }

    #[tokio::test]
    async fn offline_tutor_uses_canned_reply() {
        let tutor = Tutor::offline();
        assert!(!tutor.is_online());
        let reply = tutor.reply("what is a neural network?", vec![], &[]).await;
        assert_eq!(reply.source, ReplySource::Canned);
        assert!(!reply.reply.is_empty());
    }

    #[tokio::test]
    async fn model_reply_is_returned() {
        let backend = Arc::new(MockBackend::answering("Gradient descent walks downhill."));
        let tutor = Tutor::with_backend(backend.clone());

        let history = vec![ChatTurn {
            role: ChatRole::Assistant,
            content: "Hi!".into(),
        }];
        let skills = vec![("machine-learning".to_string(), 15.0)];
        let reply = tutor.reply("explain gradient descent", history, &skills).await;

        assert_eq!(reply.source, ReplySource::Llm);
        assert_eq!(reply.reply, "Gradient descent walks downhill.");

        let seen = backend.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.messages.len(), 3);
        assert_eq!(seen.messages[0].role, "system");
        assert!(seen.messages[0].content.contains("machine-learning (15%)"));
        assert_eq!(seen.messages[1], ChatMessage::new("assistant", "Hi!"));
        assert_eq!(seen.messages[2], ChatMessage::new("user", "explain gradient descent"));
    }

    #[tokio::test]
    async fn failing_model_falls_back_to_canned() {
        let tutor = Tutor::with_backend(Arc::new(MockBackend::failing(503)));
        let reply = tutor.reply("tell me about prompts", vec![], &[]).await;
        assert_eq!(reply.source, ReplySource::Canned);
        assert!(reply.reply.contains("prompt"));
    }

    #[test]
    fn request_history_is_trimmed() {
        let history: Vec<ChatTurn> = (0..25)
            .map(|i| ChatTurn {
                role: ChatRole::User,
                content: format!("turn {i}"),
            })
            .collect();
        let request = build_request("latest", history, &[]);
        assert_eq!(request.messages.len(), MAX_HISTORY_TURNS + 2);
        assert_eq!(request.messages[1].content, "turn 15");
    }

    #[test]
    fn config_without_key_is_offline() {
        assert!(!Tutor::from_config(&TutorConfig::offline()).is_online());
    }

    #[test]
    fn reply_source_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ReplySource::Llm).unwrap(), "llm");
        assert_eq!(serde_json::to_value(ReplySource::Canned).unwrap(), "canned");
    }
}
