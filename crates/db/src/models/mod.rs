pub mod course;
pub mod event;
pub mod quiz;
pub mod session;
pub mod skill;
pub mod user;
