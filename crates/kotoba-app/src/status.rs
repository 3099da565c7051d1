use std::sync::Arc;
use std::time::Duration;

use kotoba_core::LinkStatus;
use kotoba_store::Storage;
use tokio_util::sync::CancellationToken;

/// Keep the cloud link state fresh for `/api/heartbeat`
pub async fn ping_loop(
    storage: Arc<Storage>,
    interval: Duration,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(interval);
    let mut last = LinkStatus::Connected;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Link pinger stopping");
                return Ok(());
            }
            _ = ticker.tick() => {
                let link = storage.ping().await;
                if link != last {
                    tracing::warn!("Database link: {} -> {}", last.as_str(), link.as_str());
                    last = link;
                }
            }
        }
    }
}
