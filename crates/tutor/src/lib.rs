//! AI tutor chat.
//!
//! [`OpenAiClient`] talks to any OpenAI-compatible `/chat/completions`
//! endpoint. [`Tutor`] wraps an optional [`TutorBackend`] and falls back to
//! the offline replies in [`novaai_core::tutor`] whenever the model is not
//! configured or the call fails, so a chat request always gets an answer.

pub mod client;
pub mod config;
pub mod tutor;

pub use client::{ChatMessage, CompletionRequest, OpenAiClient, TutorBackend, TutorError};
pub use config::TutorConfig;
pub use tutor::{ReplySource, Tutor, TutorReply};
