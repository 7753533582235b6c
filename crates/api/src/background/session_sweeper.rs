//! Periodic purge of expired and revoked sessions.

use std::time::Duration;

use chrono::Utc;
use novaai_db::repositories::SessionRepo;
use novaai_db::DbPool;
use tokio_util::sync::CancellationToken;

/// Delete dead sessions once now and then every `every`, until `cancel`
/// fires.
pub async fn run(pool: DbPool, every: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = every.as_secs(), "Session sweeper started");

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                sweep_once(&pool).await;
            }
        }
    }
}

/// One sweep. Errors are logged; the next tick tries again.
pub async fn sweep_once(pool: &DbPool) -> u64 {
    match SessionRepo::delete_expired(pool, Utc::now()).await {
        Ok(deleted) => {
            if deleted > 0 {
                tracing::info!(deleted, "Session sweeper: purged dead sessions");
            } else {
                tracing::debug!("Session sweeper: nothing to purge");
            }
            deleted
        }
        Err(e) => {
            tracing::error!(error = %e, "Session sweeper: cleanup failed");
            0
        }
    }
}
