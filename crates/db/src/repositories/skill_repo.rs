//! Repository for Skills DNA progress, its history, and lesson completions.
//!
//! Every progress write goes through [`novaai_core::skills`] so the stored
//! value is clamped to `[0, 100]` and the level always matches the progress.
//! Each write also appends a `skill_progress_history` sample in the same
//! transaction.

use chrono::Utc;
use novaai_core::skills::{apply_gain, clamp_progress, SkillLevel};
use novaai_core::types::{DbId, Timestamp};
use sqlx::{SqliteConnection, SqlitePool};

use crate::models::course::Lesson;
use crate::models::skill::{LessonCompletion, SkillHistoryPoint, SkillProgress};

const COLUMNS: &str = "id, user_id, skill_name, progress, current_level, updated_at";

/// Result of marking a lesson complete.
#[derive(Debug, Clone)]
pub struct LessonOutcome {
    pub completion: LessonCompletion,
    /// `false` when the lesson had already been completed (no gain applied).
    pub newly_completed: bool,
    /// Updated skill, when the lesson awards one and was newly completed.
    pub skill: Option<SkillProgress>,
}

pub struct SkillRepo;

impl SkillRepo {
    /// All skills of a user, alphabetically.
    pub async fn list_for_user(pool: &SqlitePool, user_id: DbId) -> Result<Vec<SkillProgress>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM skill_progress WHERE user_id = $1 ORDER BY skill_name");
        sqlx::query_as::<_, SkillProgress>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// A single skill of a user.
    pub async fn find(
        pool: &SqlitePool,
        user_id: DbId,
        skill_name: &str,
    ) -> Result<Option<SkillProgress>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM skill_progress WHERE user_id = $1 AND skill_name = $2");
        sqlx::query_as::<_, SkillProgress>(&query)
            .bind(user_id)
            .bind(skill_name)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite a skill's progress (clamped) and record a history sample.
    pub async fn set_progress(
        pool: &SqlitePool,
        user_id: DbId,
        skill_name: &str,
        progress: f64,
    ) -> Result<SkillProgress, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let row = write_progress(&mut tx, user_id, skill_name, clamp_progress(progress), Utc::now()).await?;
        tx.commit().await?;
        Ok(row)
    }

    /// Add `gain` points to a skill (clamped) and record a history sample.
    ///
    /// A skill the user has never touched starts from 0.
    pub async fn apply_gain(
        pool: &SqlitePool,
        user_id: DbId,
        skill_name: &str,
        gain: f64,
    ) -> Result<SkillProgress, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let current = current_progress(&mut tx, user_id, skill_name).await?;
        let row = write_progress(
            &mut tx,
            user_id,
            skill_name,
            apply_gain(current, gain),
            Utc::now(),
        )
        .await?;
        tx.commit().await?;
        Ok(row)
    }

    /// History samples for a skill, oldest first, capped at the newest `limit`.
    pub async fn history(
        pool: &SqlitePool,
        user_id: DbId,
        skill_name: &str,
        limit: i64,
    ) -> Result<Vec<SkillHistoryPoint>, sqlx::Error> {
        sqlx::query_as::<_, SkillHistoryPoint>(
            "SELECT skill_name, progress, recorded_at FROM (
                 SELECT id, skill_name, progress, recorded_at
                 FROM skill_progress_history
                 WHERE user_id = $1 AND skill_name = $2
                 ORDER BY id DESC
                 LIMIT $3
             ) ORDER BY id ASC",
        )
        .bind(user_id)
        .bind(skill_name)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// History samples recorded at or after `since`, oldest first, preceded
    /// by the last sample before `since` when there is one.
    pub async fn history_since(
        pool: &SqlitePool,
        user_id: DbId,
        skill_name: &str,
        since: Timestamp,
    ) -> Result<Vec<SkillHistoryPoint>, sqlx::Error> {
        sqlx::query_as::<_, SkillHistoryPoint>(
            "SELECT skill_name, progress, recorded_at
             FROM skill_progress_history
             WHERE user_id = $1 AND skill_name = $2
               AND id >= COALESCE(
                   (SELECT MAX(id) FROM skill_progress_history
                    WHERE user_id = $1 AND skill_name = $2 AND recorded_at < $3),
                   0)
             ORDER BY id ASC",
        )
        .bind(user_id)
        .bind(skill_name)
        .bind(since)
        .fetch_all(pool)
        .await
    }

    /// Mark a lesson complete for a user, awarding its skill gain exactly once.
    pub async fn complete_lesson(
        pool: &SqlitePool,
        user_id: DbId,
        lesson: &Lesson,
    ) -> Result<LessonOutcome, sqlx::Error> {
        let now = Utc::now();
        let mut tx = pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO lesson_completions (user_id, lesson_id, completed_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, lesson_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(lesson.id)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        let skill = match (&lesson.skill_name, inserted) {
            (Some(skill_name), true) => {
                let current = current_progress(&mut tx, user_id, skill_name).await?;
                let next = apply_gain(current, lesson.skill_gain);
                Some(write_progress(&mut tx, user_id, skill_name, next, now).await?)
            }
            _ => None,
        };

        let completion = sqlx::query_as::<_, LessonCompletion>(
            "SELECT user_id, lesson_id, completed_at FROM lesson_completions
             WHERE user_id = $1 AND lesson_id = $2",
        )
        .bind(user_id)
        .bind(lesson.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(LessonOutcome {
            completion,
            newly_completed: inserted,
            skill,
        })
    }
}

async fn current_progress(
    conn: &mut SqliteConnection,
    user_id: DbId,
    skill_name: &str,
) -> Result<f64, sqlx::Error> {
    let current: Option<f64> = sqlx::query_scalar(
        "SELECT progress FROM skill_progress WHERE user_id = $1 AND skill_name = $2",
    )
    .bind(user_id)
    .bind(skill_name)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(current.unwrap_or(0.0))
}

async fn write_progress(
    conn: &mut SqliteConnection,
    user_id: DbId,
    skill_name: &str,
    progress: f64,
    now: Timestamp,
) -> Result<SkillProgress, sqlx::Error> {
    let level = SkillLevel::from_progress(progress);
    let query = format!(
        "INSERT INTO skill_progress (user_id, skill_name, progress, current_level, updated_at)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (user_id, skill_name) DO UPDATE SET
             progress = excluded.progress,
             current_level = excluded.current_level,
             updated_at = excluded.updated_at
         RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as::<_, SkillProgress>(&query)
        .bind(user_id)
        .bind(skill_name)
        .bind(progress)
        .bind(level.as_str())
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

    sqlx::query(
        "INSERT INTO skill_progress_history (user_id, skill_name, progress, recorded_at)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(user_id)
    .bind(skill_name)
    .bind(progress)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    tracing::debug!(user_id, skill_name, progress, level = level.as_str(), "Skill progress written");
    Ok(row)
}
