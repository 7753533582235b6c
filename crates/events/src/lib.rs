//! Learning-activity event bus.
//!
//! - [`EventBus`] fans [`PlatformEvent`]s out to every subscriber over a
//!   `tokio::sync::broadcast` channel.
//! - [`EventPersistence`] is the subscriber that writes each event to the
//!   `events` table.

pub mod bus;
pub mod persistence;

pub use bus::{EventBus, PlatformEvent};
pub use persistence::{EventPersistence, PersistenceStats};
