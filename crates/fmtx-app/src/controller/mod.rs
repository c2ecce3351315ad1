//! Session controller
//!
//! The single authority over the FM chip. It owns the logical session state,
//! the device handles and the interruption flags, and is driven one call at a
//! time by the engine's event queue. Every mode switch is disable, settle,
//! enable; every failure path ends with the state matching the hardware.
//!
//! Device handles exist only while their device is enabled: `transmitter` is
//! `Some` exactly when the session is `On`, `receiver` exactly when it is
//! `Searching`.


use std::sync::Arc;

use tokio::sync::broadcast;

use fmtx_core::prelude::*;
use fmtx_core::{
    CallState, DeviceKind, DriverEvent, DriverEventSender, Frequency, InterruptSnapshot,
    PowerMode, SearchRequest, SessionState,
};
use fmtx_driver::{FmHardware, Receiver, Transmitter};

use crate::config::{ConfigSource, TransmitterSettings};
use crate::engine_event::EngineEvent;
use crate::interrupts::LineId;
use crate::listener::{ClientListener, ListenerSlot};
use crate::message::{StatusReport, TrackMetadata};
use crate::state::ControllerState;
use crate::transition::{derive_transition, Transition};

/// Radio text reported by the `radio_text` query
pub const RADIO_TEXT: &str = "Radio Text: Transmitting ";

pub struct SessionController {
    hardware: Box<dyn FmHardware>,
    transmitter: Option<Box<dyn Transmitter>>,
    receiver: Option<Box<dyn Receiver>>,
    listener: ListenerSlot,
    config: Box<dyn ConfigSource>,
    settings: TransmitterSettings,
    state: ControllerState,
    driver_tx: DriverEventSender,
    event_tx: broadcast::Sender<EngineEvent>,
}

impl SessionController {
    /// Create a controller in the `Off` state.
    ///
    /// `driver_tx` is handed to the driver whenever a device is opened;
    /// its receiver must feed [`on_driver_event`](Self::on_driver_event).
    pub fn new(
        hardware: Box<dyn FmHardware>,
        config: Box<dyn ConfigSource>,
        settings: TransmitterSettings,
        driver_tx: DriverEventSender,
        event_tx: broadcast::Sender<EngineEvent>,
    ) -> Self {
        Self {
            hardware,
            transmitter: None,
            receiver: None,
            listener: ListenerSlot::new(),
            config,
            settings,
            state: ControllerState::new(),
            driver_tx,
            event_tx,
        }
    }

    // ─────────────────────────────────────────────────────────
    // Mode Transitions
    // ─────────────────────────────────────────────────────────

    /// Enable the transmitter with the current configuration.
    ///
    /// Returns `true` without touching the hardware when already on. On any
    /// enable or power-level failure the session ends `Off`.
    pub async fn turn_on(&mut self) -> bool {
        match self.state.session {
            SessionState::On => {
                debug!("turn_on: transmitter already on");
                return true;
            }
            SessionState::Searching => {
                self.release_receiver();
                self.settle().await;
            }
            SessionState::Off => {}
        }

        match self
            .enable_transmitter()
            .context("Failed to turn on FM transmitter")
        {
            Ok(()) => {
                info!("FM transmitter on");
                self.set_session(SessionState::On);
                self.emit(EngineEvent::TransmitterStateChanged { on: true });
                true
            }
            Err(_) => {
                self.set_session(SessionState::Off);
                false
            }
        }
    }

    /// Explicit client turn-off. Clears the resume intent.
    pub fn turn_off(&mut self) -> bool {
        self.state.resume_after_interrupt = false;
        self.power_down()
    }

    /// Disable whatever is active, settle, then turn the transmitter on
    #[instrument(skip(self))]
    pub async fn restart(&mut self) -> bool {
        info!("Restarting FM transmitter");
        self.turn_off();
        self.settle().await;
        self.turn_on().await
    }

    /// Apply the current configuration to the active transmitter.
    ///
    /// The client is always told `onReconfigured`; the return value says
    /// whether the hardware accepted it.
    pub fn reconfigure(&mut self) -> bool {
        let config = self.config.fm_config();
        let applied = match (self.state.session, self.transmitter.as_mut()) {
            (SessionState::On, Some(tx)) => match tx.configure(&config) {
                Ok(()) => {
                    debug!("Reconfigured transmitter for {:?}", config.band);
                    true
                }
                Err(e) => {
                    warn!("Failed to reconfigure transmitter: {}", e);
                    false
                }
            },
            (state, _) => {
                warn!("{}", Error::invalid_state("reconfigure", state));
                false
            }
        };
        self.listener.reconfigured();
        applied
    }

    /// Tune the active transmitter
    pub fn tune(&mut self, frequency: Frequency) -> bool {
        if !self.config.fm_config().contains(frequency) {
            warn!("Frequency {} outside the configured band", frequency);
            return false;
        }
        let Some(tx) = self.transmitter.as_mut() else {
            warn!("{}", Error::invalid_state("tune", self.state.session));
            return false;
        };
        match tx
            .set_station(frequency)
            .with_context(|| format!("Failed to tune to {}", frequency))
        {
            Ok(()) => {
                self.state.tuned_frequency = Some(frequency);
                self.emit(EngineEvent::NotificationUpdated {
                    frequency: Some(frequency),
                });
                true
            }
            Err(_) => false,
        }
    }

    /// Switch to receive-scan mode and search for the weakest channels.
    ///
    /// Both devices are disabled and the chip settles before a fresh
    /// receiver is enabled, even when a search is already running. On failure
    /// the client gets `onSearchListComplete(false)` and the session ends
    /// `Off`.
    #[instrument(skip(self))]
    pub async fn start_search(&mut self, max_stations: u32) -> bool {
        self.state.resume_after_interrupt = false;

        let was_transmitting = self.transmitter.is_some();
        self.release_transmitter();
        self.release_receiver();
        if was_transmitting {
            self.emit(EngineEvent::TransmitterStateChanged { on: false });
        }
        self.settle().await;

        let request = SearchRequest::weakest(max_stations);
        match self
            .begin_search(&request)
            .context("Failed to start station search")
        {
            Ok(()) => {
                info!("Searching for up to {} free channels", max_stations);
                self.set_session(SessionState::Searching);
                true
            }
            Err(_) => {
                self.release_receiver();
                self.set_session(SessionState::Off);
                self.listener.search_list_complete(false);
                false
            }
        }
    }

    /// Cancel the running search. The client is told the search failed.
    pub fn cancel_search(&mut self) -> bool {
        let (SessionState::Searching, Some(rx)) = (self.state.session, self.receiver.as_mut())
        else {
            warn!("{}", Error::invalid_state("cancel search", self.state.session));
            return false;
        };
        let cancelled = match rx.cancel_search() {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to cancel search: {}", e);
                false
            }
        };
        self.listener.search_list_complete(false);
        cancelled
    }

    // ─────────────────────────────────────────────────────────
    // Client Binding
    // ─────────────────────────────────────────────────────────

    pub fn bind(&mut self) {
        debug!("Client bound");
        self.state.client_bound = true;
        self.apply_power_mode(PowerMode::Normal);
    }

    pub fn unbind(&mut self) {
        debug!("Client unbound");
        self.state.client_bound = false;
        self.listener.unregister();
        self.apply_power_mode(PowerMode::Low);
    }

    pub fn register_listener(&mut self, listener: Arc<dyn ClientListener>) {
        self.listener.register(listener);
    }

    pub fn unregister_listener(&mut self) {
        self.listener.unregister();
    }

    // ─────────────────────────────────────────────────────────
    // Interruption Signals
    // ─────────────────────────────────────────────────────────

    pub async fn set_call_state(
        &mut self,
        line: LineId,
        state: CallState,
        ring_volume: u32,
    ) -> Transition {
        let changed = self.state.interrupts.set_call_state(line, state, ring_volume);
        self.on_interrupt_changed(changed).await
    }

    pub async fn set_headset_plugged(&mut self, plugged: bool) -> Transition {
        let changed = self.state.interrupts.set_headset_plugged(plugged);
        self.on_interrupt_changed(changed).await
    }

    /// Map an accessory playback report onto the A2DP flag.
    ///
    /// Playing sets the flag, disconnecting clears it, connected-but-paused
    /// leaves it as it was.
    pub async fn set_a2dp_state(&mut self, playing: bool, connected: bool) -> Transition {
        let changed = if playing {
            self.state.interrupts.set_a2dp_playing(true)
        } else if !connected {
            self.state.interrupts.set_a2dp_playing(false)
        } else {
            None
        };
        self.on_interrupt_changed(changed).await
    }

    pub async fn set_hdmi_connected(&mut self, connected: bool) -> Transition {
        let changed = self.state.interrupts.set_hdmi_connected(connected);
        self.on_interrupt_changed(changed).await
    }

    async fn on_interrupt_changed(&mut self, changed: Option<InterruptSnapshot>) -> Transition {
        let Some(snapshot) = changed else {
            return Transition::None;
        };

        let input = self.state.transition_input(self.listener.is_registered());
        let transition = derive_transition(&input);
        debug!(
            "Interrupt level {:?} ({:?}) while {}: {:?}",
            snapshot.level(),
            snapshot,
            self.state.session,
            transition
        );

        match transition {
            Transition::Suspend => {
                info!("Interruption active, suspending FM transmitter");
                self.power_down();
                self.state.resume_after_interrupt = true;
                if self.state.client_bound {
                    self.listener.disabled();
                }
            }
            Transition::Resume => {
                info!("Interruptions cleared, resuming FM transmitter");
                let enabled = self.turn_on().await;
                self.state.resume_after_interrupt = false;
                self.listener.enabled(enabled);
            }
            Transition::None => {}
        }
        transition
    }

    // ─────────────────────────────────────────────────────────
    // Driver Callbacks and Metadata
    // ─────────────────────────────────────────────────────────

    pub fn on_driver_event(&mut self, event: DriverEvent) {
        trace!("Driver event: {}", event.event_type());
        match event {
            DriverEvent::TuneStatusChanged {
                device: DeviceKind::Transmitter,
                frequency,
            } => self.on_transmitter_tuned(frequency),
            DriverEvent::TuneStatusChanged {
                device: DeviceKind::Receiver,
                frequency,
            } => debug!("Receiver tuned to {}", frequency),
            DriverEvent::SearchListComplete => {
                if self.state.session == SessionState::Searching {
                    self.listener.search_list_complete(true);
                } else {
                    debug!(
                        "Ignoring search-list-complete while {}",
                        self.state.session
                    );
                }
            }
            DriverEvent::ReceiverEnabled | DriverEvent::ReceiverDisabled => {
                debug!("Receiver reported {}", event.event_type());
            }
        }
    }

    fn on_transmitter_tuned(&mut self, frequency: Frequency) {
        self.state.tuned_frequency = Some(frequency);
        self.emit(EngineEvent::NotificationUpdated {
            frequency: Some(frequency),
        });
        self.listener.tune_status_changed(frequency);

        let Some(tx) = self.transmitter.as_mut() else {
            return;
        };
        let ps = &self.settings;
        match tx.start_ps_info(&ps.ps_text, ps.program, ps.ps_repeat_count) {
            Ok(()) => self.listener.ps_info_sent(&self.settings.ps_text),
            Err(e) => warn!("Failed to send PS info: {}", e),
        }
    }

    /// Push new track metadata as radio text and forward it to the client
    pub fn on_metadata_changed(&mut self, metadata: &TrackMetadata) {
        let text = metadata.radio_text();
        if let Some(tx) = self.transmitter.as_mut() {
            if let Err(e) = tx.start_rt_info(&text, self.settings.program) {
                warn!("Failed to send radio text: {}", e);
            }
        }
        self.listener.meta_data_changed(&text);
    }

    /// Controller teardown: hardware off, session reset to `Off`
    pub fn shutdown(&mut self) {
        info!("Shutting down session controller");
        self.power_down();
        self.state.resume_after_interrupt = false;
        self.state.client_bound = false;
        self.listener.unregister();
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn session(&self) -> SessionState {
        self.state.session
    }

    pub fn is_on(&self) -> bool {
        self.state.session.is_on()
    }

    pub fn tuned_frequency(&self) -> Option<Frequency> {
        self.state.tuned_frequency
    }

    pub fn resume_after_interrupt(&self) -> bool {
        self.state.resume_after_interrupt
    }

    pub fn is_headset_plugged(&self) -> bool {
        self.state.interrupts.headset_plugged()
    }

    pub fn is_call_active(&self) -> bool {
        self.state.interrupts.call_active()
    }

    pub fn radio_text(&self) -> &'static str {
        RADIO_TEXT
    }

    pub fn ps_data(&self) -> &str {
        &self.settings.ps_text
    }

    /// Stations found by the last search; empty unless searching
    pub fn search_list(&mut self) -> Vec<Frequency> {
        self.receiver
            .as_mut()
            .map(|rx| rx.station_list())
            .unwrap_or_default()
    }

    /// Whether the chip's internal antenna can be used.
    ///
    /// Only the receiver can tell; without one the answer is `true`.
    pub fn is_internal_antenna_available(&mut self) -> bool {
        self.receiver
            .as_mut()
            .map(|rx| rx.internal_antenna())
            .unwrap_or(true)
    }

    pub fn status(&self) -> StatusReport {
        StatusReport {
            session: self.state.session,
            tuned_frequency: self.state.tuned_frequency,
            resume_after_interrupt: self.state.resume_after_interrupt,
            client_bound: self.state.client_bound,
            interrupt_level: self.state.interrupts.level(),
            headset_plugged: self.is_headset_plugged(),
            call_active: self.is_call_active(),
            radio_text: RADIO_TEXT.to_string(),
            ps_data: self.settings.ps_text.clone(),
        }
    }

    // ─────────────────────────────────────────────────────────
    // Hardware Helpers
    // ─────────────────────────────────────────────────────────

    fn enable_transmitter(&mut self) -> Result<()> {
        let config = self.config.fm_config();
        let mut tx = self.hardware.open_transmitter(self.driver_tx.clone())?;

        tx.enable(&config)?;
        if let Err(e) = tx.set_tx_power_level(self.settings.power_level) {
            if let Err(disable_err) = tx.disable() {
                warn!("Failed to disable transmitter after power error: {}", disable_err);
            }
            return Err(e);
        }
        if let Err(e) = tx.set_rds_on() {
            warn!("RDS not enabled: {}", e);
        }
        if let Some(frequency) = self.state.tuned_frequency {
            if let Err(e) = tx.set_station(frequency) {
                warn!("Failed to restore station {}: {}", frequency, e);
            }
        }

        self.transmitter = Some(tx);
        Ok(())
    }

    fn begin_search(&mut self, request: &SearchRequest) -> Result<()> {
        let config = self.config.fm_config();
        let mut rx = self.hardware.open_receiver(self.driver_tx.clone())?;
        rx.enable(&config)?;
        let rx = self.receiver.insert(rx);
        rx.set_station(config.lower_limit)?;
        rx.search_station_list(request)
    }

    /// Disable every device and end `Off`. Emits the transmitter-off
    /// broadcast unless already off.
    fn power_down(&mut self) -> bool {
        if self.state.session == SessionState::Off
            && self.transmitter.is_none()
            && self.receiver.is_none()
        {
            debug!("power_down: already off");
            return true;
        }

        let tx_ok = self.release_transmitter();
        let rx_ok = self.release_receiver();
        self.set_session(SessionState::Off);
        self.emit(EngineEvent::TransmitterStateChanged { on: false });
        info!("FM transmitter off");
        tx_ok && rx_ok
    }

    fn release_transmitter(&mut self) -> bool {
        let Some(mut tx) = self.transmitter.take() else {
            return true;
        };
        tx.disable()
            .map_err(|e| warn!("Failed to disable transmitter: {}", e))
            .is_ok()
    }

    fn release_receiver(&mut self) -> bool {
        let Some(mut rx) = self.receiver.take() else {
            return true;
        };
        rx.disable()
            .map_err(|e| warn!("Failed to disable receiver: {}", e))
            .is_ok()
    }

    fn apply_power_mode(&mut self, mode: PowerMode) {
        if let Some(tx) = self.transmitter.as_mut() {
            if let Err(e) = tx.set_power_mode(mode) {
                warn!("Failed to set power mode {:?}: {}", mode, e);
            }
        }
    }

    /// Hardware settle interval between mode switches
    fn settle(&self) -> tokio::time::Sleep {
        tokio::time::sleep(self.settings.settle_delay())
    }

    fn set_session(&mut self, new: SessionState) {
        let old = std::mem::replace(&mut self.state.session, new);
        if old == new {
            return;
        }
        debug!("Session {} -> {}", old, new);
        self.emit(EngineEvent::SessionStateChanged { old, new });
        if new == SessionState::On {
            self.emit(EngineEvent::NotificationUpdated {
                frequency: self.state.tuned_frequency,
            });
        } else if old == SessionState::On {
            self.emit(EngineEvent::NotificationCleared);
        }
    }

    fn emit(&self, event: EngineEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }
}
