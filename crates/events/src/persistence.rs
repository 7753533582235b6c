//! Background writer that drains the bus into the `events` table.
//!
//! Every learning-activity event (registrations, lesson completions, quiz
//! submissions, tutor messages, client analytics) ends up as one row. A row
//! that fails to insert is logged and counted; the loop keeps going.

use novaai_db::repositories::EventRepo;
use novaai_db::DbPool;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;

use crate::bus::PlatformEvent;

/// Tally reported when the bus closes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceStats {
    pub written: u64,
    pub failed: u64,
    /// Events dropped because this subscriber fell behind the channel.
    pub skipped: u64,
}

pub struct EventPersistence;

impl EventPersistence {
    /// Write events until every [`EventBus`](crate::bus::EventBus) handle is
    /// dropped, then report what happened.
    pub async fn run(pool: DbPool, mut receiver: Receiver<PlatformEvent>) -> PersistenceStats {
        let mut stats = PersistenceStats::default();

        loop {
            let event = match receiver.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(n)) => {
                    stats.skipped += n;
                    tracing::warn!(skipped = n, "Event writer fell behind; events dropped");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let result = EventRepo::insert(
                &pool,
                &event.event_type,
                event.source_entity_type.as_deref(),
                event.source_entity_id,
                event.actor_user_id,
                &event.payload,
                event.timestamp,
            )
            .await;

            match result {
                Ok(_) => stats.written += 1,
                Err(e) => {
                    stats.failed += 1;
                    tracing::error!(
                        error = %e,
                        event_type = %event.event_type,
                        actor_user_id = ?event.actor_user_id,
                        "Could not store event"
                    );
                }
            }
        }

        tracing::info!(
            written = stats.written,
            failed = stats.failed,
            skipped = stats.skipped,
            "Event bus closed, writer stopping"
        );
        stats
    }
}
