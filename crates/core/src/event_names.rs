//! Platform event type names published on the event bus.

pub const USER_REGISTERED: &str = "user.registered";
pub const USER_LOGGED_IN: &str = "user.logged_in";
pub const USER_LOGGED_OUT: &str = "user.logged_out";
pub const LESSON_COMPLETED: &str = "lesson.completed";
pub const SKILL_UPDATED: &str = "skill.updated";
pub const QUIZ_SUBMITTED: &str = "quiz.submitted";
pub const TUTOR_MESSAGE: &str = "tutor.message";

/// Prefix applied to event types submitted by the frontend via `POST /events`.
pub const CLIENT_PREFIX: &str = "client.";

/// Build the stored event type for a client-submitted event name.
pub fn client_event(name: &str) -> String {
    format!("{CLIENT_PREFIX}{name}")
}
