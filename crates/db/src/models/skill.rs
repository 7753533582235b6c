//! Skills DNA models: progress, history, goals and lesson completions.

use novaai_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `skill_progress` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillProgress {
    pub id: DbId,
    pub user_id: DbId,
    pub skill_name: String,
    pub progress: f64,
    pub current_level: String,
    pub updated_at: Timestamp,
}

/// A row from the `skill_progress_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillHistoryPoint {
    pub skill_name: String,
    pub progress: f64,
    pub recorded_at: Timestamp,
}

/// A row from the `skill_goals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGoal {
    pub id: DbId,
    pub user_id: DbId,
    pub skill_name: String,
    pub target_progress: f64,
    pub deadline: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing a goal.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSkillGoal {
    pub target_progress: f64,
    pub deadline: Option<Timestamp>,
}

/// A row from the `lesson_completions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonCompletion {
    pub user_id: DbId,
    pub lesson_id: DbId,
    pub completed_at: Timestamp,
}
