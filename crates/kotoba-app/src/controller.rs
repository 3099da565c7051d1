use std::sync::Arc;
use std::time::Duration;

use kotoba_core::StorageMode;
use kotoba_store::Storage;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::handlers::router;
use crate::state::AppState;
use crate::status::ping_loop;
use crate::watchdog::{Watchdog, WatchdogExit};

/// Application controller for task spawning and lifecycle
pub struct AppController {
    state: Arc<AppState>,
    storage: Arc<Storage>,
    watchdog: Option<Watchdog>,
    ping_interval: Duration,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(
        state: Arc<AppState>,
        storage: Arc<Storage>,
        watchdog: Option<Watchdog>,
        ping_interval: Duration,
    ) -> Self {
        Self {
            state,
            storage,
            watchdog,
            ping_interval,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&mut self, listener: TcpListener) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // HTTP server
        let app = router(self.state.clone());
        let cancel = self.cancel_token.child_token();
        tasks.spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { cancel.cancelled().await })
                .await?;
            tracing::info!("HTTP server stopped");
            Ok(())
        });

        // Heartbeat watchdog
        if let Some(watchdog) = self.watchdog.take() {
            let timeout = watchdog.timeout();
            let cancel = self.cancel_token.clone();
            tasks.spawn(async move {
                match watchdog.run(cancel.child_token()).await {
                    WatchdogExit::Expired => {
                        tracing::warn!("No heartbeat for {:?}. Shutting down", timeout);
                        cancel.cancel();
                    }
                    exit => tracing::debug!("Watchdog finished: {:?}", exit),
                }
                Ok(())
            });
        } else {
            tracing::info!("Heartbeat watchdog disabled");
        }

        // Cloud link pinger
        if self.storage.mode() == StorageMode::Cloud {
            tasks.spawn(ping_loop(
                self.storage.clone(),
                self.ping_interval,
                self.cancel_token.child_token(),
            ));
        }

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }

    /// Run until Ctrl+C or until any task exits, then drain the rest
    pub async fn run(mut self, listener: TcpListener) -> anyhow::Result<()> {
        let mut tasks = self.spawn_tasks(listener);

        tokio::select! {
            result = tokio::signal::ctrl_c() => match result {
                Ok(()) => tracing::info!("Shutdown requested"),
                Err(e) => tracing::error!("Failed to listen for Ctrl+C: {}", e),
            },
            Some(result) = tasks.join_next() => log_exit(result),
        }

        self.shutdown();
        while let Some(result) = tasks.join_next().await {
            log_exit(result);
        }

        tracing::info!("Shutdown complete");
        Ok(())
    }
}

fn log_exit(result: Result<anyhow::Result<()>, tokio::task::JoinError>) {
    match result {
        Ok(Ok(())) => tracing::debug!("Task exited"),
        Ok(Err(e)) => tracing::error!("Task failed: {e}"),
        Err(e) => tracing::error!("Task panicked: {e}"),
    }
}
