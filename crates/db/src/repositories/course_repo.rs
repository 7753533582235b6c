//! Repository for the catalog tables: `courses`, `course_modules`, `lessons`.

use chrono::Utc;
use novaai_core::types::DbId;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::course::{
    Course, CourseDetail, CourseModule, CreateCourse, CreateLesson, CreateModule, Lesson,
    ModuleWithLessons,
};

const COURSE_COLUMNS: &str = "id, slug, title, description, level, duration_hours, skill_tags, \
                               is_published, created_at, updated_at";

const MODULE_COLUMNS: &str = "id, course_id, position, title, description";

const LESSON_COLUMNS: &str =
    "id, module_id, position, title, content, duration_minutes, skill_name, skill_gain";

/// Provides read/write operations for the course catalog.
pub struct CourseRepo;

impl CourseRepo {
    /// List published courses ordered by id.
    pub async fn list_published(pool: &SqlitePool) -> Result<Vec<Course>, sqlx::Error> {
        let query = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE is_published = 1 ORDER BY id");
        sqlx::query_as::<_, Course>(&query).fetch_all(pool).await
    }

    /// Find a course by ID (published or not).
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a course with its modules and lessons, or `None` if it does not exist.
    pub async fn find_detail(pool: &SqlitePool, id: DbId) -> Result<Option<CourseDetail>, sqlx::Error> {
        let Some(course) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let modules = Self::list_modules(pool, id).await?;
        let lessons = Self::list_lessons_for_course(pool, id).await?;

        let modules = modules
            .into_iter()
            .map(|module| ModuleWithLessons {
                lessons: lessons
                    .iter()
                    .filter(|l| l.module_id == module.id)
                    .cloned()
                    .collect(),
                module,
            })
            .collect();

        Ok(Some(CourseDetail { course, modules }))
    }

    /// Insert a new course, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateCourse) -> Result<Course, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO courses
                (slug, title, description, level, duration_hours, skill_tags, is_published, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
             RETURNING {COURSE_COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.level)
            .bind(input.duration_hours)
            .bind(Json(&input.skill_tags))
            .bind(input.is_published)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// List a course's modules in position order.
    pub async fn list_modules(pool: &SqlitePool, course_id: DbId) -> Result<Vec<CourseModule>, sqlx::Error> {
        let query = format!(
            "SELECT {MODULE_COLUMNS} FROM course_modules WHERE course_id = $1 ORDER BY position"
        );
        sqlx::query_as::<_, CourseModule>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// Find a module by ID.
    pub async fn find_module(pool: &SqlitePool, id: DbId) -> Result<Option<CourseModule>, sqlx::Error> {
        let query = format!("SELECT {MODULE_COLUMNS} FROM course_modules WHERE id = $1");
        sqlx::query_as::<_, CourseModule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Append a module at the end of a course.
    pub async fn create_module(
        pool: &SqlitePool,
        course_id: DbId,
        input: &CreateModule,
    ) -> Result<CourseModule, sqlx::Error> {
        let query = format!(
            "INSERT INTO course_modules (course_id, position, title, description)
             VALUES ($1,
                     COALESCE((SELECT MAX(position) FROM course_modules WHERE course_id = $1), 0) + 1,
                     $2, $3)
             RETURNING {MODULE_COLUMNS}"
        );
        sqlx::query_as::<_, CourseModule>(&query)
            .bind(course_id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a lesson by ID.
    pub async fn find_lesson(pool: &SqlitePool, id: DbId) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE id = $1");
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All lessons of a course, ordered by module position then lesson position.
    pub async fn list_lessons_for_course(
        pool: &SqlitePool,
        course_id: DbId,
    ) -> Result<Vec<Lesson>, sqlx::Error> {
        sqlx::query_as::<_, Lesson>(
            "SELECT l.id, l.module_id, l.position, l.title, l.content, l.duration_minutes,
                    l.skill_name, l.skill_gain
             FROM lessons l
             JOIN course_modules m ON m.id = l.module_id
             WHERE m.course_id = $1
             ORDER BY m.position, l.position",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await
    }

    /// Append a lesson at the end of a module. `skill_name` must already be normalized.
    pub async fn create_lesson(
        pool: &SqlitePool,
        module_id: DbId,
        input: &CreateLesson,
    ) -> Result<Lesson, sqlx::Error> {
        let query = format!(
            "INSERT INTO lessons (module_id, position, title, content, duration_minutes, skill_name, skill_gain)
             VALUES ($1,
                     COALESCE((SELECT MAX(position) FROM lessons WHERE module_id = $1), 0) + 1,
                     $2, $3, $4, $5, $6)
             RETURNING {LESSON_COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(module_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.duration_minutes)
            .bind(&input.skill_name)
            .bind(input.skill_gain)
            .fetch_one(pool)
            .await
    }

    /// IDs of courses in which the user has completed every lesson.
    ///
    /// Courses without lessons are never considered complete.
    pub async fn completed_course_ids(pool: &SqlitePool, user_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT m.course_id
             FROM lessons l
             JOIN course_modules m ON m.id = l.module_id
             LEFT JOIN lesson_completions c ON c.lesson_id = l.id AND c.user_id = $1
             GROUP BY m.course_id
             HAVING COUNT(*) = COUNT(c.lesson_id)",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
