//! Handlers for lessons: authoring, completion, and quizzes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use novaai_core::error::CoreError;
use novaai_core::event_names;
use novaai_core::quiz::{self, QuizScore, ScoredQuestion};
use novaai_core::skills::{normalize_skill_name, MAX_PROGRESS};
use novaai_core::types::DbId;
use novaai_core::validation::require_text;
use novaai_db::models::course::{CreateLesson, Lesson};
use novaai_db::models::quiz::{CreateQuizAttempt, CreateQuizQuestion, PublicQuestion, QuizQuestion};
use novaai_db::models::skill::{LessonCompletion, SkillProgress};
use novaai_db::repositories::{CourseRepo, QuizRepo, SkillRepo};
use novaai_events::PlatformEvent;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireAuthor};
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLessonResponse {
    pub completion: LessonCompletion,
    /// Updated skill when this call awarded a gain.
    pub skill: Option<SkillProgress>,
    pub already_completed: bool,
}

/// One entry per question, in question order; `null` skips a question.
#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    pub answers: Vec<Option<i64>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmission {
    pub attempt_id: DbId,
    #[serde(flatten)]
    pub score: QuizScore,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/lessons/{id}
pub async fn get_lesson(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Lesson>>> {
    Ok(Json(ApiResponse::ok(find_lesson(&state, id).await?)))
}

/// POST /api/modules/{id}/lessons
pub async fn create_lesson(
    State(state): State<AppState>,
    RequireAuthor(author): RequireAuthor,
    Path(module_id): Path<DbId>,
    Json(input): Json<CreateLesson>,
) -> AppResult<(StatusCode, Json<ApiResponse<Lesson>>)> {
    CourseRepo::find_module(&state.pool, module_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "module",
            id: module_id,
        }))?;

    if !input.skill_gain.is_finite() || !(0.0..=MAX_PROGRESS).contains(&input.skill_gain) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "skillGain must be between 0 and {MAX_PROGRESS}"
        ))));
    }
    if input.duration_minutes < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "durationMinutes must not be negative".into(),
        )));
    }

    let input = CreateLesson {
        title: require_text("title", &input.title)?,
        content: input.content,
        duration_minutes: input.duration_minutes,
        skill_name: input
            .skill_name
            .as_deref()
            .map(normalize_skill_name)
            .transpose()?,
        skill_gain: input.skill_gain,
    };
    let lesson = CourseRepo::create_lesson(&state.pool, module_id, &input).await?;
    tracing::info!(lesson_id = lesson.id, module_id, author_id = author.user_id, "Lesson created");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(lesson))))
}

/// POST /api/lessons/{id}/complete
///
/// Idempotent: the skill gain is awarded on the first completion only.
pub async fn complete_lesson(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<CompleteLessonResponse>>> {
    let lesson = find_lesson(&state, id).await?;
    let outcome = SkillRepo::complete_lesson(&state.pool, user.user_id, &lesson).await?;

    if outcome.newly_completed {
        tracing::info!(user_id = user.user_id, lesson_id = id, "Lesson completed");
        state.event_bus.publish(
            PlatformEvent::new(event_names::LESSON_COMPLETED)
                .with_source("lesson", id)
                .with_actor(user.user_id)
                .with_payload(serde_json::json!({ "skill": lesson.skill_name })),
        );
    }
    if let Some(skill) = &outcome.skill {
        publish_skill_update(&state, user.user_id, skill, "lesson");
    }

    Ok(Json(ApiResponse::ok(CompleteLessonResponse {
        completion: outcome.completion,
        skill: outcome.skill,
        already_completed: !outcome.newly_completed,
    })))
}

/// GET /api/lessons/{id}/quiz
///
/// Questions without their answer key.
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<PublicQuestion>>>> {
    find_lesson(&state, id).await?;
    let questions = QuizRepo::list_questions(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(
        questions.into_iter().map(PublicQuestion::from).collect(),
    )))
}

/// POST /api/lessons/{id}/quiz
pub async fn submit_quiz(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<SubmitQuizRequest>,
) -> AppResult<Json<ApiResponse<QuizSubmission>>> {
    find_lesson(&state, id).await?;
    let questions = QuizRepo::list_questions(&state.pool, id).await?;
    if questions.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "lesson {id} has no quiz"
        ))));
    }

    let scored: Vec<ScoredQuestion> = questions.iter().map(to_scored).collect();
    // Negative indices can never match an option; map them out of range.
    let answers: Vec<Option<usize>> = input
        .answers
        .iter()
        .map(|a| a.map(|i| usize::try_from(i).unwrap_or(usize::MAX)))
        .collect();
    let score = quiz::score(&scored, &answers)?;

    let attempt = QuizRepo::record_attempt(
        &state.pool,
        &CreateQuizAttempt {
            user_id: user.user_id,
            lesson_id: id,
            earned_points: i64::from(score.earned_points),
            possible_points: i64::from(score.possible_points),
            percent: score.percent,
            passed: score.passed,
            answers: input.answers,
        },
    )
    .await?;

    tracing::info!(
        user_id = user.user_id,
        lesson_id = id,
        percent = score.percent,
        passed = score.passed,
        "Quiz submitted"
    );
    state.event_bus.publish(
        PlatformEvent::new(event_names::QUIZ_SUBMITTED)
            .with_source("lesson", id)
            .with_actor(user.user_id)
            .with_payload(serde_json::json!({
                "attemptId": attempt.id,
                "percent": score.percent,
                "passed": score.passed,
            })),
    );

    Ok(Json(ApiResponse::ok(QuizSubmission {
        attempt_id: attempt.id,
        score,
    })))
}

/// POST /api/lessons/{id}/questions
pub async fn create_question(
    State(state): State<AppState>,
    RequireAuthor(author): RequireAuthor,
    Path(lesson_id): Path<DbId>,
    Json(input): Json<CreateQuizQuestion>,
) -> AppResult<(StatusCode, Json<ApiResponse<QuizQuestion>>)> {
    find_lesson(&state, lesson_id).await?;

    let options: Vec<String> = input.options.iter().map(|o| o.trim().to_string()).collect();
    let correct_index = usize::try_from(input.correct_index).map_err(|_| {
        CoreError::Validation("correctIndex must not be negative".into())
    })?;
    let points = u32::try_from(input.points)
        .map_err(|_| CoreError::Validation("points must be a positive integer".into()))?;
    quiz::validate_question(&options, correct_index, points)?;

    let input = CreateQuizQuestion {
        prompt: require_text("prompt", &input.prompt)?,
        options,
        correct_index: input.correct_index,
        points: input.points,
    };
    let question = QuizRepo::create_question(&state.pool, lesson_id, &input).await?;
    tracing::info!(question_id = question.id, lesson_id, author_id = author.user_id, "Quiz question created");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(question))))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_lesson(state: &AppState, id: DbId) -> AppResult<Lesson> {
    CourseRepo::find_lesson(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "lesson", id }))
}

/// Stored rows were validated on insert, so the conversions cannot fail in
/// practice; a corrupt row simply scores zero.
fn to_scored(q: &QuizQuestion) -> ScoredQuestion {
    ScoredQuestion {
        question_id: q.id,
        option_count: q.options.len(),
        correct_index: usize::try_from(q.correct_index).unwrap_or(usize::MAX),
        points: u32::try_from(q.points).unwrap_or(0),
    }
}

/// Publish `skill.updated` for a progress change.
pub(crate) fn publish_skill_update(state: &AppState, user_id: DbId, skill: &SkillProgress, cause: &str) {
    state.event_bus.publish(
        PlatformEvent::new(event_names::SKILL_UPDATED)
            .with_actor(user_id)
            .with_payload(serde_json::json!({
                "skill": skill.skill_name,
                "progress": skill.progress,
                "level": skill.current_level,
                "cause": cause,
            })),
    );
}
