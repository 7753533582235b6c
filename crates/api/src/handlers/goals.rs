//! Handlers for skill goals and their days-to-target projections.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use novaai_core::goals::{self, DeadlineStatus, GoalProjection, Sample, DEFAULT_LOOKBACK_DAYS};
use novaai_core::skills::normalize_skill_name;
use novaai_core::types::{DbId, Timestamp};
use novaai_db::models::skill::{SkillGoal, UpsertSkillGoal};
use novaai_db::repositories::{SkillGoalRepo, SkillRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::ApiResponse;
use crate::state::AppState;

/// A goal with where the learner stands and where they are heading.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: SkillGoal,
    pub current_progress: f64,
    pub projection: GoalProjection,
    pub deadline_status: DeadlineStatus,
}

/// GET /api/skills/goals
pub async fn list_goals(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<ApiResponse<Vec<GoalView>>>> {
    let goals = SkillGoalRepo::list_for_user(&state.pool, user.user_id).await?;
    let now = Utc::now();

    let mut views = Vec::with_capacity(goals.len());
    for goal in goals {
        views.push(build_view(&state, user.user_id, goal, now).await?);
    }
    Ok(Json(ApiResponse::ok(views)))
}

/// PUT /api/skills/goals/{name}
pub async fn upsert_goal(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(name): Path<String>,
    Json(input): Json<UpsertSkillGoal>,
) -> AppResult<Json<ApiResponse<GoalView>>> {
    let name = normalize_skill_name(&name)?;
    goals::validate_target(input.target_progress)?;

    let goal = SkillGoalRepo::upsert(&state.pool, user.user_id, &name, &input).await?;
    tracing::info!(user_id = user.user_id, skill = %name, target = input.target_progress, "Skill goal set");

    let view = build_view(&state, user.user_id, goal, Utc::now()).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// DELETE /api/skills/goals/{name}
///
/// Idempotent: deleting a goal that does not exist is still 204.
pub async fn delete_goal(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(name): Path<String>,
) -> AppResult<StatusCode> {
    let name = normalize_skill_name(&name)?;
    let deleted = SkillGoalRepo::delete(&state.pool, user.user_id, &name).await?;
    tracing::debug!(user_id = user.user_id, skill = %name, deleted, "Skill goal delete");
    Ok(StatusCode::NO_CONTENT)
}

async fn build_view(
    state: &AppState,
    user_id: DbId,
    goal: SkillGoal,
    now: Timestamp,
) -> AppResult<GoalView> {
    let current_progress = SkillRepo::find(&state.pool, user_id, &goal.skill_name)
        .await?
        .map_or(0.0, |s| s.progress);

    let since = now - Duration::days(DEFAULT_LOOKBACK_DAYS);
    let history: Vec<Sample> = SkillRepo::history_since(&state.pool, user_id, &goal.skill_name, since)
        .await?
        .into_iter()
        .map(|p| Sample {
            recorded_at: p.recorded_at,
            progress: p.progress,
        })
        .collect();

    let samples = goals::pick_samples(&history, now, DEFAULT_LOOKBACK_DAYS);
    let projection = goals::project(samples, current_progress, goal.target_progress);
    let deadline_status = goals::deadline_status(&projection, goal.deadline);

    Ok(GoalView {
        goal,
        current_progress,
        projection,
        deadline_status,
    })
}
