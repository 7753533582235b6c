//! Repository for the `skill_goals` table.

use chrono::Utc;
use novaai_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::skill::{SkillGoal, UpsertSkillGoal};

const COLUMNS: &str = "id, user_id, skill_name, target_progress, deadline, created_at, updated_at";

pub struct SkillGoalRepo;

impl SkillGoalRepo {
    /// A user's goals, alphabetically by skill.
    pub async fn list_for_user(pool: &SqlitePool, user_id: DbId) -> Result<Vec<SkillGoal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM skill_goals WHERE user_id = $1 ORDER BY skill_name");
        sqlx::query_as::<_, SkillGoal>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Create or replace the goal for `(user_id, skill_name)`.
    pub async fn upsert(
        pool: &SqlitePool,
        user_id: DbId,
        skill_name: &str,
        input: &UpsertSkillGoal,
    ) -> Result<SkillGoal, sqlx::Error> {
        let query = format!(
            "INSERT INTO skill_goals (user_id, skill_name, target_progress, deadline, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)
             ON CONFLICT (user_id, skill_name) DO UPDATE SET
                 target_progress = excluded.target_progress,
                 deadline = excluded.deadline,
                 updated_at = excluded.updated_at
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SkillGoal>(&query)
            .bind(user_id)
            .bind(skill_name)
            .bind(input.target_progress)
            .bind(input.deadline)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Delete a goal. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, user_id: DbId, skill_name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM skill_goals WHERE user_id = $1 AND skill_name = $2")
            .bind(user_id)
            .bind(skill_name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
