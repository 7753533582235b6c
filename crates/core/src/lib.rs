//! Domain types and pure logic for the NovaAI University backend.
//!
//! Nothing in this crate performs I/O. Persistence lives in `novaai-db`,
//! HTTP in `novaai-api`.

pub mod error;
pub mod event_names;
pub mod goals;
pub mod quiz;
pub mod recommendation;
pub mod roles;
pub mod skills;
pub mod tutor;
pub mod types;
pub mod validation;
