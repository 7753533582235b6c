//! Quiz question and attempt models.

use novaai_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `quiz_questions` table, including the answer key.
///
/// Only authors ever see this shape; learners get [`PublicQuestion`].
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: DbId,
    pub lesson_id: DbId,
    pub position: i64,
    pub prompt: String,
    #[sqlx(json)]
    pub options: Vec<String>,
    pub correct_index: i64,
    pub points: i64,
}

/// Learner-facing question without the answer key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: DbId,
    pub position: i64,
    pub prompt: String,
    pub options: Vec<String>,
    pub points: i64,
}

impl From<QuizQuestion> for PublicQuestion {
    fn from(q: QuizQuestion) -> Self {
        Self {
            id: q.id,
            position: q.position,
            prompt: q.prompt,
            options: q.options,
            points: q.points,
        }
    }
}

/// DTO for adding a question to a lesson.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: i64,
    #[serde(default = "default_points")]
    pub points: i64,
}

fn default_points() -> i64 {
    1
}

/// A row from the `quiz_attempts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub id: DbId,
    pub user_id: DbId,
    pub lesson_id: DbId,
    pub earned_points: i64,
    pub possible_points: i64,
    pub percent: f64,
    pub passed: bool,
    #[sqlx(json)]
    pub answers: Vec<Option<i64>>,
    pub created_at: Timestamp,
}

/// DTO for recording a scored attempt.
#[derive(Debug)]
pub struct CreateQuizAttempt {
    pub user_id: DbId,
    pub lesson_id: DbId,
    pub earned_points: i64,
    pub possible_points: i64,
    pub percent: f64,
    pub passed: bool,
    pub answers: Vec<Option<i64>>,
}
