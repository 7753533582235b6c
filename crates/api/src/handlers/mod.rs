pub mod auth;
pub mod courses;
pub mod events;
pub mod goals;
pub mod lessons;
pub mod recommendations;
pub mod skills;
pub mod tutor;
