//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role` in
//! the users migration.

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_INSTRUCTOR: &str = "instructor";
pub const ROLE_ADMIN: &str = "admin";

/// Whether `role` may author catalog content (courses, modules, lessons).
pub fn can_author(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_INSTRUCTOR
}
