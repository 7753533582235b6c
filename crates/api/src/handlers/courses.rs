//! Handlers for the course catalog: courses and their modules.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use novaai_core::error::CoreError;
use novaai_core::recommendation::CourseLevel;
use novaai_core::roles::can_author;
use novaai_core::skills::normalize_skill_name;
use novaai_core::types::DbId;
use novaai_core::validation::{require_text, validate_slug};
use novaai_db::models::course::{Course, CourseDetail, CourseModule, CreateCourse, CreateModule};
use novaai_db::repositories::CourseRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeAuthUser;
use crate::middleware::rbac::RequireAuthor;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/courses
///
/// Published courses as a bare JSON array.
pub async fn list_courses(State(state): State<AppState>) -> AppResult<Json<Vec<Course>>> {
    let courses = CourseRepo::list_published(&state.pool).await?;
    Ok(Json(courses))
}

/// GET /api/courses/{id}
///
/// Course with its modules and lessons. Drafts are visible to authors only.
pub async fn get_course(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<CourseDetail>>> {
    let not_found = || AppError::Core(CoreError::NotFound { entity: "course", id });

    let detail = CourseRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;

    let is_author = viewer.0.as_ref().is_some_and(|u| can_author(&u.role));
    if !detail.course.is_published && !is_author {
        return Err(not_found());
    }

    Ok(Json(ApiResponse::ok(detail)))
}

/// POST /api/courses
pub async fn create_course(
    State(state): State<AppState>,
    RequireAuthor(author): RequireAuthor,
    Json(input): Json<CreateCourse>,
) -> AppResult<(StatusCode, Json<ApiResponse<Course>>)> {
    let slug = input.slug.trim().to_string();
    validate_slug(&slug)?;
    let level = CourseLevel::parse(input.level.trim())?;
    if !input.duration_hours.is_finite() || input.duration_hours < 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "durationHours must be a non-negative number".into(),
        )));
    }

    let mut skill_tags = input
        .skill_tags
        .iter()
        .map(|t| normalize_skill_name(t))
        .collect::<Result<Vec<_>, _>>()?;
    skill_tags.sort();
    skill_tags.dedup();

    let normalized = CreateCourse {
        slug,
        title: require_text("title", &input.title)?,
        description: input.description.trim().to_string(),
        level: level.as_str().to_string(),
        duration_hours: input.duration_hours,
        skill_tags,
        is_published: input.is_published,
    };

    let course = CourseRepo::create(&state.pool, &normalized).await?;
    tracing::info!(course_id = course.id, slug = %course.slug, author_id = author.user_id, "Course created");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(course))))
}

/// POST /api/courses/{id}/modules
///
/// Append a module at the end of the course.
pub async fn create_module(
    State(state): State<AppState>,
    RequireAuthor(author): RequireAuthor,
    Path(course_id): Path<DbId>,
    Json(input): Json<CreateModule>,
) -> AppResult<(StatusCode, Json<ApiResponse<CourseModule>>)> {
    CourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "course",
            id: course_id,
        }))?;

    let input = CreateModule {
        title: require_text("title", &input.title)?,
        description: input.description.trim().to_string(),
    };
    let module = CourseRepo::create_module(&state.pool, course_id, &input).await?;
    tracing::info!(module_id = module.id, course_id, author_id = author.user_id, "Module created");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(module))))
}
