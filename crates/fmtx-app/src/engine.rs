//! Engine - the single actor that owns the session controller
//!
//! All entry points funnel into one message queue: client requests through
//! [`EngineHandle`], interruption signals from platform glue, and driver
//! callbacks bridged in from the driver event channel. Messages are handled
//! one at a time in arrival order, so the controller needs no locks.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use fmtx_core::prelude::*;
use fmtx_core::{CallState, DriverEventReceiver, Frequency};
use fmtx_driver::FmHardware;

use crate::config::{self, ConfigSource, Settings, SharedConfig};
use crate::controller::SessionController;
use crate::engine_event::EngineEvent;
use crate::interrupts::LineId;
use crate::listener::ClientListener;
use crate::message::{Message, Reply, StatusReport, TrackMetadata};
use crate::process;

/// Capacity of the message queue
const MESSAGE_CAPACITY: usize = 256;

/// Capacity of the engine event broadcast
const EVENT_CAPACITY: usize = 256;

/// Orchestration engine for the FM transmitter.
///
/// Owns:
/// - the session controller (the model)
/// - the message channel
/// - the driver event channel
/// - the shutdown signal
/// - the engine event broadcaster
pub struct Engine {
    /// Session controller; mutated only by this engine
    pub controller: SessionController,

    /// Sender half of the message channel.
    /// Clone this (or use [`handle`](Self::handle)) to feed the engine.
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the message channel
    pub msg_rx: mpsc::Receiver<Message>,

    /// Driver callbacks, taken by the bridge task when the engine runs
    driver_rx: Option<DriverEventReceiver>,

    /// Sender for the shutdown signal. Send `true` to stop background tasks.
    pub shutdown_tx: watch::Sender<bool>,

    /// Receiver for the shutdown signal
    pub shutdown_rx: watch::Receiver<bool>,

    /// Settings the engine was built with
    pub settings: Settings,

    /// Event broadcaster for external consumers
    event_tx: broadcast::Sender<EngineEvent>,
}

impl Engine {
    /// Create an engine around `hardware`.
    ///
    /// `config` is read on every enable, reconfigure and search.
    pub fn new(
        hardware: Box<dyn FmHardware>,
        config: Box<dyn ConfigSource>,
        settings: Settings,
    ) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(MESSAGE_CAPACITY);
        let (driver_tx, driver_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

        let controller = SessionController::new(
            hardware,
            config,
            settings.transmitter.clone(),
            driver_tx,
            event_tx.clone(),
        );

        Self {
            controller,
            msg_tx,
            msg_rx,
            driver_rx: Some(driver_rx),
            shutdown_tx,
            shutdown_rx,
            settings,
            event_tx,
        }
    }

    /// Create an engine configured from `<dir>/.fmtx/config.toml`.
    ///
    /// Seeds the config directory if needed (non-fatal if it fails) and
    /// returns the [`SharedConfig`] so the band can be changed later.
    pub fn from_dir(hardware: Box<dyn FmHardware>, dir: &Path) -> (Self, SharedConfig) {
        if let Err(e) = config::init_config_dir(dir) {
            warn!("Failed to initialize .fmtx directory: {}", e);
        }
        let settings = config::load_settings(dir);
        let shared = SharedConfig::new(settings.radio);
        let engine = Self::new(hardware, Box::new(shared.clone()), settings);
        (engine, shared)
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind, older events are dropped and the
    /// receiver reports `RecvError::Lagged`.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Non-owning handle for clients and signal sources
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            msg_tx: self.msg_tx.clone(),
        }
    }

    /// Process a single message through the controller
    pub async fn process_message(&mut self, msg: Message) {
        process::process_message(&mut self.controller, msg).await;
    }

    /// Drain and process all pending messages.
    ///
    /// Returns the number of messages processed.
    pub async fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            let quit = msg.is_shutdown();
            self.process_message(msg).await;
            count += 1;
            if quit {
                self.finish_shutdown();
                break;
            }
        }
        count
    }

    /// Run the event loop until a `Shutdown` message arrives
    pub async fn run(mut self) {
        if let Some(driver_rx) = self.driver_rx.take() {
            spawn_driver_bridge(driver_rx, self.msg_tx.clone(), self.shutdown_rx.clone());
        }

        info!("FM transmitter engine running");
        while let Some(msg) = self.msg_rx.recv().await {
            let quit = msg.is_shutdown();
            self.process_message(msg).await;
            if quit {
                self.finish_shutdown();
                break;
            }
        }
        info!("FM transmitter engine stopped");
    }

    /// Spawn the event loop on the current runtime
    pub fn spawn(self) -> (EngineHandle, JoinHandle<()>) {
        let handle = self.handle();
        let task = tokio::spawn(self.run());
        (handle, task)
    }

    /// Tear down: hardware off, session reset, `Shutdown` broadcast
    pub fn shutdown(&mut self) {
        self.controller.shutdown();
        self.finish_shutdown();
    }

    fn finish_shutdown(&mut self) {
        let _ = self.event_tx.send(EngineEvent::Shutdown);
        let _ = self.shutdown_tx.send(true);
    }
}

/// Forward driver callbacks into the message queue.
///
/// Keeps driver events in arrival order relative to every other message.
fn spawn_driver_bridge(
    mut driver_rx: DriverEventReceiver,
    msg_tx: mpsc::Sender<Message>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                event = driver_rx.recv() => {
                    let Some(event) = event else { break };
                    if msg_tx.send(Message::Driver(event)).await.is_err() {
                        break;
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
        debug!("Driver event bridge stopped");
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Cloneable, non-owning handle to a running engine.
///
/// Every call enqueues a message; requests wait for the engine's reply.
/// Fails with [`Error::ChannelSend`] or [`Error::ChannelClosed`] once the
/// engine has stopped.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    msg_tx: mpsc::Sender<Message>,
}

impl EngineHandle {
    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Message) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.send(make(reply)).await?;
        rx.await.map_err(|_| Error::ChannelClosed)
    }

    async fn send(&self, msg: Message) -> Result<()> {
        self.msg_tx
            .send(msg)
            .await
            .map_err(|e| Error::channel_send(e.to_string()))
    }

    // ─────────────────────────────────────────────────────────
    // Client Requests
    // ─────────────────────────────────────────────────────────

    pub async fn turn_on(&self) -> Result<bool> {
        self.request(|reply| Message::TurnOn { reply }).await
    }

    pub async fn turn_off(&self) -> Result<bool> {
        self.request(|reply| Message::TurnOff { reply }).await
    }

    pub async fn restart(&self) -> Result<bool> {
        self.request(|reply| Message::Restart { reply }).await
    }

    pub async fn reconfigure(&self) -> Result<bool> {
        self.request(|reply| Message::Reconfigure { reply }).await
    }

    pub async fn tune(&self, frequency: Frequency) -> Result<bool> {
        self.request(|reply| Message::Tune { frequency, reply }).await
    }

    pub async fn start_search(&self, max_stations: u32) -> Result<bool> {
        self.request(|reply| Message::StartSearch {
            max_stations,
            reply,
        })
        .await
    }

    pub async fn cancel_search(&self) -> Result<bool> {
        self.request(|reply| Message::CancelSearch { reply }).await
    }

    // ─────────────────────────────────────────────────────────
    // Client Binding
    // ─────────────────────────────────────────────────────────

    pub async fn bind(&self) -> Result<()> {
        self.send(Message::Bind).await
    }

    pub async fn unbind(&self) -> Result<()> {
        self.send(Message::Unbind).await
    }

    pub async fn register_listener(&self, listener: Arc<dyn ClientListener>) -> Result<()> {
        self.send(Message::RegisterListener(listener)).await
    }

    pub async fn unregister_listener(&self) -> Result<()> {
        self.send(Message::UnregisterListener).await
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub async fn status(&self) -> Result<StatusReport> {
        self.request(|reply| Message::Status { reply }).await
    }

    pub async fn is_on(&self) -> Result<bool> {
        Ok(self.status().await?.is_on())
    }

    pub async fn search_list(&self) -> Result<Vec<Frequency>> {
        self.request(|reply| Message::SearchList { reply }).await
    }

    pub async fn is_internal_antenna_available(&self) -> Result<bool> {
        self.request(|reply| Message::InternalAntenna { reply }).await
    }

    // ─────────────────────────────────────────────────────────
    // Interruption Signals
    // ─────────────────────────────────────────────────────────

    pub async fn call_state_changed(
        &self,
        line: LineId,
        state: CallState,
        ring_volume: u32,
    ) -> Result<()> {
        self.send(Message::CallStateChanged {
            line,
            state,
            ring_volume,
        })
        .await
    }

    pub async fn headset_plug_changed(&self, plugged: bool) -> Result<()> {
        self.send(Message::HeadsetPlugChanged { plugged }).await
    }

    pub async fn a2dp_state_changed(&self, playing: bool, connected: bool) -> Result<()> {
        self.send(Message::A2dpStateChanged { playing, connected }).await
    }

    pub async fn hdmi_connection_changed(&self, connected: bool) -> Result<()> {
        self.send(Message::HdmiConnectionChanged { connected }).await
    }

    pub async fn metadata_changed(&self, metadata: TrackMetadata) -> Result<()> {
        self.send(Message::MetadataChanged(metadata)).await
    }

    // ─────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────

    /// Stop the engine and wait until teardown finished
    pub async fn shutdown(&self) -> Result<()> {
        self.request(|reply| Message::Shutdown { reply: Some(reply) }).await
    }
}
