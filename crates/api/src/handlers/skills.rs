//! Handlers for the learner's Skills DNA.

use axum::extract::{Path, Query, State};
use axum::Json;
use novaai_core::skills::{self, DnaSummary};
use novaai_db::models::skill::{SkillHistoryPoint, SkillProgress};
use novaai_db::repositories::SkillRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::lessons::publish_skill_update;
use crate::middleware::rbac::RequireAuth;
use crate::response::ApiResponse;
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: i64 = 100;
const MAX_HISTORY_LIMIT: i64 = 1000;

#[derive(Debug, Serialize)]
pub struct SkillsDna {
    pub skills: Vec<SkillProgress>,
    pub summary: DnaSummary,
}

#[derive(Debug, Deserialize)]
pub struct SetProgressRequest {
    pub progress: f64,
}

/// Percentage points to add; negative values subtract.
#[derive(Debug, Deserialize)]
pub struct ProgressDeltaRequest {
    pub delta: f64,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

/// GET /api/skills
pub async fn list_skills(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<ApiResponse<SkillsDna>>> {
    let skills = SkillRepo::list_for_user(&state.pool, user.user_id).await?;
    let summary = skills::summarize(skills.iter().map(|s| (s.skill_name.as_str(), s.progress)));
    Ok(Json(ApiResponse::ok(SkillsDna { skills, summary })))
}

/// PUT /api/skills/{name}
///
/// Set progress to an explicit value in `[0, 100]`.
pub async fn set_skill(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(name): Path<String>,
    Json(input): Json<SetProgressRequest>,
) -> AppResult<Json<ApiResponse<SkillProgress>>> {
    let name = skills::normalize_skill_name(&name)?;
    let progress = skills::validate_progress(input.progress)?;

    let skill = SkillRepo::set_progress(&state.pool, user.user_id, &name, progress).await?;
    publish_skill_update(&state, user.user_id, &skill, "manual");
    Ok(Json(ApiResponse::ok(skill)))
}

/// POST /api/skills/{name}/progress
///
/// Add a delta; the result is clamped to `[0, 100]`.
pub async fn add_progress(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(name): Path<String>,
    Json(input): Json<ProgressDeltaRequest>,
) -> AppResult<Json<ApiResponse<SkillProgress>>> {
    let name = skills::normalize_skill_name(&name)?;
    let delta = skills::validate_delta(input.delta)?;

    let skill = SkillRepo::apply_gain(&state.pool, user.user_id, &name, delta).await?;
    publish_skill_update(&state, user.user_id, &skill, "delta");
    Ok(Json(ApiResponse::ok(skill)))
}

/// GET /api/skills/{name}/history?limit=
///
/// Most recent samples, oldest first.
pub async fn skill_history(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(name): Path<String>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<ApiResponse<Vec<SkillHistoryPoint>>>> {
    let name = skills::normalize_skill_name(&name)?;
    let limit = params
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    let history = SkillRepo::history(&state.pool, user.user_id, &name, limit).await?;
    Ok(Json(ApiResponse::ok(history)))
}
