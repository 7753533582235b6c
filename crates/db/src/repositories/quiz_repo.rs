//! Repository for `quiz_questions` and `quiz_attempts`.

use chrono::Utc;
use novaai_core::types::DbId;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::quiz::{CreateQuizAttempt, CreateQuizQuestion, QuizAttempt, QuizQuestion};

const QUESTION_COLUMNS: &str = "id, lesson_id, position, prompt, options, correct_index, points";

const ATTEMPT_COLUMNS: &str = "id, user_id, lesson_id, earned_points, possible_points, percent, \
                                passed, answers, created_at";

pub struct QuizRepo;

impl QuizRepo {
    /// Questions for a lesson in position order.
    pub async fn list_questions(pool: &SqlitePool, lesson_id: DbId) -> Result<Vec<QuizQuestion>, sqlx::Error> {
        let query = format!(
            "SELECT {QUESTION_COLUMNS} FROM quiz_questions WHERE lesson_id = $1 ORDER BY position"
        );
        sqlx::query_as::<_, QuizQuestion>(&query)
            .bind(lesson_id)
            .fetch_all(pool)
            .await
    }

    /// Append a question to a lesson's quiz.
    pub async fn create_question(
        pool: &SqlitePool,
        lesson_id: DbId,
        input: &CreateQuizQuestion,
    ) -> Result<QuizQuestion, sqlx::Error> {
        let query = format!(
            "INSERT INTO quiz_questions (lesson_id, position, prompt, options, correct_index, points)
             VALUES ($1,
                     COALESCE((SELECT MAX(position) FROM quiz_questions WHERE lesson_id = $1), 0) + 1,
                     $2, $3, $4, $5)
             RETURNING {QUESTION_COLUMNS}"
        );
        sqlx::query_as::<_, QuizQuestion>(&query)
            .bind(lesson_id)
            .bind(&input.prompt)
            .bind(Json(&input.options))
            .bind(input.correct_index)
            .bind(input.points)
            .fetch_one(pool)
            .await
    }

    /// Persist a scored attempt.
    pub async fn record_attempt(
        pool: &SqlitePool,
        input: &CreateQuizAttempt,
    ) -> Result<QuizAttempt, sqlx::Error> {
        let query = format!(
            "INSERT INTO quiz_attempts
                (user_id, lesson_id, earned_points, possible_points, percent, passed, answers, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {ATTEMPT_COLUMNS}"
        );
        sqlx::query_as::<_, QuizAttempt>(&query)
            .bind(input.user_id)
            .bind(input.lesson_id)
            .bind(input.earned_points)
            .bind(input.possible_points)
            .bind(input.percent)
            .bind(input.passed)
            .bind(Json(&input.answers))
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// A user's attempts for a lesson, newest first.
    pub async fn list_attempts(
        pool: &SqlitePool,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<Vec<QuizAttempt>, sqlx::Error> {
        let query = format!(
            "SELECT {ATTEMPT_COLUMNS} FROM quiz_attempts
             WHERE user_id = $1 AND lesson_id = $2
             ORDER BY id DESC"
        );
        sqlx::query_as::<_, QuizAttempt>(&query)
            .bind(user_id)
            .bind(lesson_id)
            .fetch_all(pool)
            .await
    }
}
