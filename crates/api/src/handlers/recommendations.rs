//! Course recommendations from the learner's skill gaps.

use std::collections::{HashMap, HashSet};

use axum::extract::{Query, State};
use axum::Json;
use novaai_core::recommendation::{self, CourseLevel, CourseProfile, Recommendation};
use novaai_db::repositories::{CourseRepo, SkillRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::ApiResponse;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 5;
const MAX_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct RecommendationParams {
    pub limit: Option<usize>,
}

/// GET /api/recommendations?limit=
pub async fn recommend(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<RecommendationParams>,
) -> AppResult<Json<ApiResponse<Vec<Recommendation>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let courses: Vec<CourseProfile> = CourseRepo::list_published(&state.pool)
        .await?
        .into_iter()
        .filter_map(|c| match CourseLevel::parse(&c.level) {
            Ok(level) => Some(CourseProfile {
                course_id: c.id,
                title: c.title,
                level,
                skill_tags: c.skill_tags,
            }),
            Err(e) => {
                tracing::warn!(course_id = c.id, error = %e, "Skipping course with unknown level");
                None
            }
        })
        .collect();

    let progress: HashMap<String, f64> = SkillRepo::list_for_user(&state.pool, user.user_id)
        .await?
        .into_iter()
        .map(|s| (s.skill_name, s.progress))
        .collect();

    let completed: HashSet<_> = CourseRepo::completed_course_ids(&state.pool, user.user_id)
        .await?
        .into_iter()
        .collect();

    let ranked = recommendation::rank(&courses, &progress, &completed, limit);
    tracing::debug!(user_id = user.user_id, count = ranked.len(), "Recommendations computed");
    Ok(Json(ApiResponse::ok(ranked)))
}
