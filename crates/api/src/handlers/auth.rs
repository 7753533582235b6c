//! Handlers for the `/auth` resource (register, login, me, logout).

use axum::extract::State;
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{Duration, Utc};
use novaai_core::error::CoreError;
use novaai_core::event_names;
use novaai_core::roles::ROLE_STUDENT;
use novaai_core::types::Timestamp;
use novaai_core::validation::{normalize_email, validate_username};
use novaai_db::models::session::CreateSession;
use novaai_db::models::user::{CreateUser, User, UserResponse};
use novaai_db::repositories::{SessionRepo, UserRepo};
use novaai_events::PlatformEvent;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::session::generate_session_token;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Maximum consecutive failed login attempts before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i64 = 15;

/// Stored user agents are cut to this many characters.
const MAX_USER_AGENT_CHARS: usize = 256;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32, message = "must be 3 to 32 characters"))]
    pub username: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
}

/// `username` also accepts an email address.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Returned by register and login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserResponse,
    /// Opaque bearer token. Only returned here; the server keeps its hash.
    pub session_id: String,
    pub expires_at: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Create a student account and log it in.
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input.validate()?;
    let username = input.username.trim().to_string();
    validate_username(&username)?;
    validate_password_strength(&input.password, state.config.password_min_length)
        .map_err(CoreError::Validation)?;
    let email = normalize_email(&input.email);

    if UserRepo::find_by_username(&state.pool, &username).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Username is already taken".into(),
        )));
    }
    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already registered".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username,
            email,
            password_hash,
            role: ROLE_STUDENT.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    state.event_bus.publish(
        PlatformEvent::new(event_names::USER_REGISTERED)
            .with_source("user", user.id)
            .with_actor(user.id),
    );

    let response = start_session(&state, &user, &headers).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
///
/// Authenticate with username (or email) + password.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        ))
    };

    // 1. Find the user by username or email.
    let identifier = input.username.trim();
    let user = if identifier.contains('@') {
        UserRepo::find_by_email(&state.pool, &normalize_email(identifier)).await?
    } else {
        UserRepo::find_by_username(&state.pool, identifier).await?
    }
    .ok_or_else(invalid)?;

    // 2. Check the account is active and not locked. A lapsed lock restarts
    //    the failure count.
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }
    let now = Utc::now();
    if let Some(locked_until) = user.locked_until {
        if locked_until > now {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".into(),
            )));
        }
        UserRepo::clear_lapsed_lock(&state.pool, user.id, now).await?;
    }

    // 3. Verify the password; count failures and lock past the threshold.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        let failures = UserRepo::increment_failed_login(&state.pool, user.id).await?;
        if failures >= MAX_FAILED_ATTEMPTS {
            let lock_until = now + Duration::minutes(LOCK_DURATION_MINS);
            UserRepo::lock_account(&state.pool, user.id, lock_until).await?;
            tracing::warn!(user_id = user.id, failures, "Account locked after failed logins");
        }

        return Err(invalid());
    }

    // 4. Reset counters and open a session.
    let user = UserRepo::record_successful_login(&state.pool, user.id).await?;
    state.event_bus.publish(
        PlatformEvent::new(event_names::USER_LOGGED_IN)
            .with_source("user", user.id)
            .with_actor(user.id),
    );

    Ok(Json(start_session(&state, &user, &headers).await?))
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<MeResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: auth.user_id,
        }))?;
    Ok(Json(MeResponse {
        success: true,
        user: UserResponse::from(&user),
    }))
}

/// POST /api/auth/logout
///
/// Revoke the session that made this request. Other devices stay logged in.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<LogoutResponse>> {
    SessionRepo::revoke(&state.pool, auth.session_id).await?;
    state.event_bus.publish(
        PlatformEvent::new(event_names::USER_LOGGED_OUT)
            .with_source("user", auth.user_id)
            .with_actor(auth.user_id),
    );
    Ok(Json(LogoutResponse { success: true }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Persist a new session for `user` and build the response carrying the
/// plaintext token.
async fn start_session(state: &AppState, user: &User, headers: &HeaderMap) -> AppResult<AuthResponse> {
    let (token, token_hash) = generate_session_token();
    let expires_at = Utc::now() + Duration::hours(state.config.session.ttl_hours);

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|ua| ua.chars().take(MAX_USER_AGENT_CHARS).collect());

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            token_hash,
            user_agent,
            expires_at,
        },
    )
    .await?;

    Ok(AuthResponse {
        success: true,
        user: UserResponse::from(user),
        session_id: token,
        expires_at,
    })
}
