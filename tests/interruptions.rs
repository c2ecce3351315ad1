//! Integration tests driving a spawned engine through its handle
//!
//! Run with: cargo test --test interruptions

use std::sync::Arc;

use fm_transmitter::app::test_utils::{Notification, RecordingListener};
use fm_transmitter::app::TrackMetadata;
use fm_transmitter::core::{CallState, DeviceKind, DriverEvent, FmConfig, RadioBand};
use fm_transmitter::driver::test_utils::{HwCall, MockHardware};
use fm_transmitter::{Engine, EngineEvent, EngineHandle, Frequency, SessionState, Settings};
use tokio::sync::broadcast;

// ─────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────

struct Harness {
    handle: EngineHandle,
    hw: MockHardware,
    listener: Arc<RecordingListener>,
    events: broadcast::Receiver<EngineEvent>,
    task: tokio::task::JoinHandle<()>,
}

/// Spawn an engine with a bound client and a registered listener
async fn spawn_bound() -> Harness {
    let hw = MockHardware::new();
    let engine = Engine::new(
        Box::new(hw.clone()),
        Box::new(FmConfig::default()),
        Settings::default(),
    );
    let events = engine.subscribe();
    let (handle, task) = engine.spawn();

    let listener = Arc::new(RecordingListener::new());
    handle.register_listener(listener.clone()).await.unwrap();
    handle.bind().await.unwrap();

    Harness {
        handle,
        hw,
        listener,
        events,
        task,
    }
}

impl Harness {
    async fn state(&self) -> SessionState {
        self.handle.status().await.unwrap().session
    }

    async fn stop(self) {
        self.handle.shutdown().await.unwrap();
        self.task.await.unwrap();
    }
}

// ─────────────────────────────────────────────────────────
// Scenarios
// ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_headset_suspend_and_resume() {
    let h = spawn_bound().await;
    assert!(h.handle.turn_on().await.unwrap());
    assert!(h.handle.tune(Frequency::from_khz(91_500)).await.unwrap());

    h.handle.headset_plug_changed(true).await.unwrap();
    let status = h.handle.status().await.unwrap();
    assert_eq!(status.session, SessionState::Off);
    assert!(status.resume_after_interrupt);
    assert_eq!(h.listener.count(&Notification::Disabled), 1);

    h.handle.headset_plug_changed(false).await.unwrap();
    let status = h.handle.status().await.unwrap();
    assert_eq!(status.session, SessionState::On);
    assert!(!status.resume_after_interrupt);
    assert_eq!(h.listener.count(&Notification::Enabled(true)), 1);

    // Resuming retunes the station that was active before the interruption
    assert_eq!(
        h.hw
            .count(&HwCall::SetStation(DeviceKind::Transmitter, Frequency::from_khz(91_500))),
        2
    );
    assert!(!h.hw.overlap_detected());

    h.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_muted_ring_keeps_transmitting() {
    let h = spawn_bound().await;
    assert!(h.handle.turn_on().await.unwrap());

    h.handle
        .call_state_changed(0, CallState::Ringing, 0)
        .await
        .unwrap();
    assert_eq!(h.state().await, SessionState::On);

    h.handle
        .call_state_changed(0, CallState::Offhook, 0)
        .await
        .unwrap();
    assert_eq!(h.state().await, SessionState::Off);
    assert!(h.handle.status().await.unwrap().call_active);

    h.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_search_then_turn_on() {
    let h = spawn_bound().await;
    h.hw.set_station_list(vec![Frequency::from_khz(88_300)]);
    assert!(h.handle.turn_on().await.unwrap());

    assert!(h.handle.start_search(1).await.unwrap());
    assert_eq!(h.state().await, SessionState::Searching);

    h.hw.emit(DriverEvent::SearchListComplete);
    let mut found = Vec::new();
    for _ in 0..10 {
        if h.listener.count(&Notification::SearchListComplete(true)) == 1 {
            found = h.handle.search_list().await.unwrap();
            break;
        }
        tokio::task::yield_now().await;
        h.handle.status().await.unwrap();
    }
    assert_eq!(found, vec![Frequency::from_khz(88_300)]);
    assert_eq!(h.state().await, SessionState::Searching);

    assert!(h.handle.turn_on().await.unwrap());
    assert_eq!(h.state().await, SessionState::On);
    assert!(!h.hw.overlap_detected());

    h.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_enable_reports_false() {
    let h = spawn_bound().await;
    h.hw.fail(DeviceKind::Transmitter, fm_transmitter::driver::ops::ENABLE);

    assert!(!h.handle.turn_on().await.unwrap());
    assert_eq!(h.state().await, SessionState::Off);
    assert_eq!(h.listener.count(&Notification::Enabled(true)), 0);

    h.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_metadata_and_broadcasts() {
    let mut h = spawn_bound().await;
    assert!(h.handle.turn_on().await.unwrap());

    h.handle
        .metadata_changed(TrackMetadata::new("Artist", "Album", "Track"))
        .await
        .unwrap();
    assert!(h.handle.turn_off().await.unwrap());

    assert_eq!(
        h.hw.count(&HwCall::StartRtInfo("Album:Track:Artist".into())),
        1
    );
    assert_eq!(
        h.listener
            .count(&Notification::MetaDataChanged("Album:Track:Artist".into())),
        1
    );

    let mut transmitter_events = Vec::new();
    while let Ok(event) = h.events.try_recv() {
        if let EngineEvent::TransmitterStateChanged { on } = event {
            transmitter_events.push(on);
        }
    }
    assert_eq!(transmitter_events, vec![true, false]);

    h.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_engine_from_config_dir() {
    let temp = tempfile::tempdir().unwrap();
    let hw = MockHardware::new();
    let (engine, shared) = Engine::from_dir(Box::new(hw.clone()), temp.path());
    assert!(temp.path().join(".fmtx").join("config.toml").exists());

    let (handle, task) = engine.spawn();
    assert!(handle.turn_on().await.unwrap());

    shared.set(FmConfig::for_band(RadioBand::Japan));
    assert!(!handle.tune(Frequency::from_khz(100_000)).await.unwrap());
    assert!(handle.reconfigure().await.unwrap());
    assert!(handle.tune(Frequency::from_khz(80_000)).await.unwrap());

    handle.shutdown().await.unwrap();
    task.await.unwrap();
    assert!(hw.enabled_devices().is_empty());
}
