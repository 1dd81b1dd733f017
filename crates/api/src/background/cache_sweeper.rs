//! Periodic removal of expired entries from the public caches.
//!
//! Expired entries are already ignored on read; this keeps memory bounded
//! when keys stop being requested.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::state::PublicCaches;

/// How often the sweeper runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(600);

/// Run the sweep loop until `cancel` is triggered.
pub async fn run(caches: Arc<PublicCaches>, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Cache sweeper started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Cache sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                let purged = caches.purge_expired().await;
                if purged > 0 {
                    tracing::debug!(purged, "Cache sweeper: dropped expired entries");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sweeper_purges_and_stops_on_cancel() {
        let caches = Arc::new(PublicCaches::new(Duration::from_secs(60)));
        caches.sitemap.insert((), "<urlset/>".into()).await;

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(Arc::clone(&caches), cancel.clone()));

        tokio::time::sleep(SWEEP_INTERVAL + Duration::from_secs(1)).await;
        assert!(caches.sitemap.is_empty().await);

        cancel.cancel();
        handle.await.unwrap();
    }
}
