//! Repository structs: one per table family, each a namespace of async
//! functions taking a [`DbPool`](crate::DbPool) reference.

mod course_repo;
mod event_repo;
mod quiz_repo;
mod session_repo;
mod skill_goal_repo;
mod skill_repo;
mod user_repo;

pub use course_repo::CourseRepo;
pub use event_repo::EventRepo;
pub use quiz_repo::QuizRepo;
pub use session_repo::SessionRepo;
pub use skill_goal_repo::SkillGoalRepo;
pub use skill_repo::{LessonOutcome, SkillRepo};
pub use user_repo::UserRepo;
