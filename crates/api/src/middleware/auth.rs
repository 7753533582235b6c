//! Session-token authentication extractors for Axum handlers.
//!
//! The token is read from `Authorization: Bearer <sessionId>` or, for
//! clients that cannot set headers, from the `?sessionId=` query parameter.
//! The header wins when both are present.

use axum::extract::{FromRequestParts, Query};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::Utc;
use novaai_core::error::CoreError;
use novaai_core::types::DbId;
use novaai_db::repositories::{SessionRepo, UserRepo};
use serde::Deserialize;

use crate::auth::session::hash_session_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from a live session.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub username: String,
    /// Role name (`"student"`, `"instructor"`, `"admin"`).
    pub role: String,
    /// Row id of the session that authenticated this request.
    pub session_id: DbId,
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

/// Pull the raw token out of the request, if one was presented.
fn presented_token(parts: &Parts) -> Result<Option<String>, AppError> {
    if let Some(value) = parts.headers.get(AUTHORIZATION) {
        let header = value
            .to_str()
            .map_err(|_| unauthorized("Malformed Authorization header"))?;
        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            unauthorized("Invalid Authorization format. Expected: Bearer <sessionId>")
        })?;
        return Ok(Some(token.trim().to_string()));
    }

    let from_query = Query::<SessionQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(q)| q.session_id)
        .filter(|t| !t.is_empty());
    Ok(from_query)
}

/// Look the token up, check the owner is still active, and bump the
/// session's last access time.
async fn resolve(state: &AppState, token: &str) -> Result<AuthUser, AppError> {
    let hash = hash_session_token(token);
    let session = SessionRepo::find_active_by_token_hash(&state.pool, &hash, Utc::now())
        .await?
        .ok_or_else(|| unauthorized("Invalid or expired session"))?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| unauthorized("Account is no longer active"))?;

    SessionRepo::touch(&state.pool, session.id).await?;

    Ok(AuthUser {
        user_id: user.id,
        username: user.username,
        role: user.role,
        session_id: session.id,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = presented_token(parts)?
            .ok_or_else(|| unauthorized("Missing session token"))?;
        resolve(state, &token).await
    }
}

/// Optional authentication.
///
/// `None` when no token was sent or the token no longer resolves to a live
/// session; a stale token in the browser should not break anonymous features
/// such as the tutor or analytics events.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn user_id(&self) -> Option<DbId> {
        self.0.as_ref().map(|u| u.user_id)
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Ok(Some(token)) = presented_token(parts) else {
            return Ok(MaybeAuthUser(None));
        };
        match resolve(state, &token).await {
            Ok(user) => Ok(MaybeAuthUser(Some(user))),
            Err(AppError::Core(CoreError::Unauthorized(reason))) => {
                tracing::debug!(%reason, "Ignoring stale session on optional-auth route");
                Ok(MaybeAuthUser(None))
            }
            Err(other) => Err(other),
        }
    }
}
