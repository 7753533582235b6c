//! Domain error taxonomy shared by every crate.
//!
//! The HTTP layer maps each variant to a status code; see
//! `novaai_api::error::AppError`.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A course, lesson, user or other row does not exist (or is hidden).
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: DbId },

    /// Learner or author input was rejected before touching storage.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A username, email, slug or other unique value is already taken.
    #[error("already exists: {0}")]
    Conflict(String),

    /// Missing, expired or revoked session, or bad credentials.
    #[error("not authenticated: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed: wrong role, locked or deactivated account.
    #[error("not allowed: {0}")]
    Forbidden(String),

    #[error("internal error: {0}")]
    Internal(String),
}
