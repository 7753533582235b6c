//! Course catalog models: courses, modules, and lessons.

use novaai_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub level: String,
    pub duration_hours: f64,
    #[sqlx(json)]
    pub skill_tags: Vec<String>,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a course.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourse {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub level: String,
    #[serde(default)]
    pub duration_hours: f64,
    #[serde(default)]
    pub skill_tags: Vec<String>,
    #[serde(default = "default_published")]
    pub is_published: bool,
}

fn default_published() -> bool {
    true
}

/// A row from the `course_modules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseModule {
    pub id: DbId,
    pub course_id: DbId,
    pub position: i64,
    pub title: String,
    pub description: String,
}

/// DTO for appending a module to a course.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateModule {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A row from the `lessons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: DbId,
    pub module_id: DbId,
    pub position: i64,
    pub title: String,
    pub content: String,
    pub duration_minutes: i64,
    pub skill_name: Option<String>,
    pub skill_gain: f64,
}

/// DTO for appending a lesson to a module.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLesson {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub duration_minutes: i64,
    pub skill_name: Option<String>,
    #[serde(default)]
    pub skill_gain: f64,
}

/// A module together with its ordered lessons.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleWithLessons {
    #[serde(flatten)]
    pub module: CourseModule,
    pub lessons: Vec<Lesson>,
}

/// A course with its full module/lesson tree.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub modules: Vec<ModuleWithLessons>,
}
