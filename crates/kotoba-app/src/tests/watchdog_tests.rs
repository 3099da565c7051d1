use std::time::{Duration, Instant};

use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::watchdog::{self, WatchdogExit};

#[tokio::test]
async fn never_fires_without_a_first_heartbeat() {
    let (_heartbeat, watchdog) = watchdog::channel(Duration::from_millis(20));

    let result = timeout(
        Duration::from_millis(200),
        watchdog.run(CancellationToken::new()),
    )
    .await;

    assert!(result.is_err(), "watchdog fired before any heartbeat");
}

#[tokio::test]
async fn expires_once_heartbeats_stop() {
    let (heartbeat, watchdog) = watchdog::channel(Duration::from_millis(50));
    heartbeat.beat();

    let exit = timeout(Duration::from_secs(2), watchdog.run(CancellationToken::new()))
        .await
        .expect("watchdog did not expire");

    assert_eq!(exit, WatchdogExit::Expired);
}

#[tokio::test]
async fn steady_heartbeats_keep_it_alive() {
    let (heartbeat, watchdog) = watchdog::channel(Duration::from_millis(150));
    heartbeat.beat();

    let beater = tokio::spawn(async move {
        for _ in 0..10 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            heartbeat.beat();
        }
        // keep the sender alive past the last beat
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let started = Instant::now();
    let exit = timeout(Duration::from_secs(3), watchdog.run(CancellationToken::new()))
        .await
        .expect("watchdog did not expire");

    assert_eq!(exit, WatchdogExit::Expired);
    assert!(started.elapsed() >= Duration::from_millis(200));
    beater.abort();
}

#[tokio::test]
async fn cancellation_stops_the_watch() {
    let (heartbeat, watchdog) = watchdog::channel(Duration::from_secs(60));
    heartbeat.beat();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let exit = timeout(Duration::from_secs(1), watchdog.run(cancel))
        .await
        .unwrap();

    assert_eq!(exit, WatchdogExit::Cancelled);
}

#[tokio::test]
async fn dropped_senders_close_it() {
    let (heartbeat, watchdog) = watchdog::channel(Duration::from_secs(60));
    drop(heartbeat);

    let exit = timeout(Duration::from_secs(1), watchdog.run(CancellationToken::new()))
        .await
        .unwrap();

    assert_eq!(exit, WatchdogExit::Closed);
}

#[test]
fn extra_beats_never_block() {
    let (heartbeat, _watchdog) = watchdog::channel(Duration::from_secs(60));
    for _ in 0..100 {
        heartbeat.beat();
    }
}
