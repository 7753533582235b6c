//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- resolves the session token to an active user.
//! - [`auth::MaybeAuthUser`] -- same, but anonymous requests are allowed.
//! - [`rbac::RequireAuthor`] -- requires the `instructor` or `admin` role.
//! - [`rbac::RequireAuth`] -- requires any authenticated user.

pub mod auth;
pub mod rbac;
