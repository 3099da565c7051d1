use std::sync::Arc;
use std::time::Duration;

use kotoba_config::storage::StorageConfig;
use kotoba_lang_japanese::JapaneseProcessor;
use kotoba_store::Storage;
use tempfile::TempDir;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

use super::fakes::FakeDictionary;
use crate::controller::AppController;
use crate::state::AppState;
use crate::watchdog;

/// Local-mode controller behind a watchdog with the given timeout
async fn controller(dir: &TempDir, watchdog_timeout: Duration) -> (AppController, Arc<AppState>) {
    let config = StorageConfig {
        mongodb_uri: None,
        data_dir: dir.path().to_path_buf(),
        ..StorageConfig::default()
    };
    let storage = Arc::new(Storage::connect(&config).await);
    let processor = JapaneseProcessor::new(Arc::new(FakeDictionary::with(&[])), None, 3);

    let (heartbeat, watchdog) = watchdog::channel(watchdog_timeout);
    let state = Arc::new(AppState::new(processor, storage.clone(), heartbeat));
    let ctl = AppController::new(
        state.clone(),
        storage,
        Some(watchdog),
        Duration::from_secs(60),
    );
    (ctl, state)
}

#[tokio::test]
async fn heartbeat_gap_stops_the_server() {
    let dir = TempDir::new().unwrap();
    let (ctl, state) = controller(&dir, Duration::from_millis(100)).await;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    state.heartbeat.beat();

    let result = timeout(Duration::from_secs(3), ctl.run(listener))
        .await
        .expect("controller kept running after heartbeats stopped");

    assert!(result.is_ok());
    assert!(TcpStream::connect(addr).await.is_err(), "listener still open");
}

#[tokio::test]
async fn keeps_serving_until_the_first_heartbeat() {
    let dir = TempDir::new().unwrap();
    let (ctl, _state) = controller(&dir, Duration::from_millis(50)).await;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let running = tokio::spawn(ctl.run(listener));
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(!running.is_finished(), "controller exited without a heartbeat");
    assert!(TcpStream::connect(addr).await.is_ok());
    running.abort();
}
