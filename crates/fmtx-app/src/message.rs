//! Message types for the controller event queue
//!
//! Every external entry point (client API calls, interruption signals,
//! driver callbacks) becomes one `Message`, processed in arrival order.
//! Requests that produce a result carry a `oneshot` reply.

use std::fmt;
use std::sync::Arc;

use tokio::sync::oneshot;

use fmtx_core::{CallState, DriverEvent, Frequency, InterruptLevel, SessionState};

use crate::interrupts::LineId;
use crate::listener::ClientListener;

/// Reply half carried by request messages
pub type Reply<T> = oneshot::Sender<T>;

/// Track metadata from the media player
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub artist: String,
    pub album: String,
    pub track: String,
}

impl TrackMetadata {
    pub fn new(
        artist: impl Into<String>,
        album: impl Into<String>,
        track: impl Into<String>,
    ) -> Self {
        Self {
            artist: artist.into(),
            album: album.into(),
            track: track.into(),
        }
    }

    /// Radio text payload: `album:track:artist`
    pub fn radio_text(&self) -> String {
        format!("{}:{}:{}", self.album, self.track, self.artist)
    }
}

/// Point-in-time view of the controller, answered by a status query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub session: SessionState,
    pub tuned_frequency: Option<Frequency>,
    pub resume_after_interrupt: bool,
    pub client_bound: bool,
    pub interrupt_level: InterruptLevel,
    pub headset_plugged: bool,
    pub call_active: bool,
    pub radio_text: String,
    pub ps_data: String,
}

impl StatusReport {
    pub fn is_on(&self) -> bool {
        self.session.is_on()
    }
}

/// All messages processed by the engine
pub enum Message {
    // ─────────────────────────────────────────────────────────
    // Client Requests
    // ─────────────────────────────────────────────────────────
    TurnOn { reply: Reply<bool> },
    TurnOff { reply: Reply<bool> },
    Restart { reply: Reply<bool> },
    Reconfigure { reply: Reply<bool> },
    Tune { frequency: Frequency, reply: Reply<bool> },
    StartSearch { max_stations: u32, reply: Reply<bool> },
    CancelSearch { reply: Reply<bool> },

    // ─────────────────────────────────────────────────────────
    // Client Binding
    // ─────────────────────────────────────────────────────────
    Bind,
    Unbind,
    RegisterListener(Arc<dyn ClientListener>),
    UnregisterListener,

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────
    Status { reply: Reply<StatusReport> },
    SearchList { reply: Reply<Vec<Frequency>> },
    InternalAntenna { reply: Reply<bool> },

    // ─────────────────────────────────────────────────────────
    // Interruption Signals
    // ─────────────────────────────────────────────────────────
    CallStateChanged {
        line: LineId,
        state: CallState,
        ring_volume: u32,
    },
    HeadsetPlugChanged { plugged: bool },
    /// Accessory playback state; `connected == false` means disconnected
    A2dpStateChanged { playing: bool, connected: bool },
    HdmiConnectionChanged { connected: bool },
    MetadataChanged(TrackMetadata),

    // ─────────────────────────────────────────────────────────
    // Driver Callbacks
    // ─────────────────────────────────────────────────────────
    Driver(DriverEvent),

    // ─────────────────────────────────────────────────────────
    // Engine Lifecycle
    // ─────────────────────────────────────────────────────────
    Shutdown { reply: Option<Reply<()>> },
}

impl Message {
    /// Returns a short string label for this message (for logging/debugging).
    pub fn label(&self) -> &'static str {
        match self {
            Self::TurnOn { .. } => "turn_on",
            Self::TurnOff { .. } => "turn_off",
            Self::Restart { .. } => "restart",
            Self::Reconfigure { .. } => "reconfigure",
            Self::Tune { .. } => "tune",
            Self::StartSearch { .. } => "start_search",
            Self::CancelSearch { .. } => "cancel_search",
            Self::Bind => "bind",
            Self::Unbind => "unbind",
            Self::RegisterListener(_) => "register_listener",
            Self::UnregisterListener => "unregister_listener",
            Self::Status { .. } => "status",
            Self::SearchList { .. } => "search_list",
            Self::InternalAntenna { .. } => "internal_antenna",
            Self::CallStateChanged { .. } => "call_state_changed",
            Self::HeadsetPlugChanged { .. } => "headset_plug_changed",
            Self::A2dpStateChanged { .. } => "a2dp_state_changed",
            Self::HdmiConnectionChanged { .. } => "hdmi_connection_changed",
            Self::MetadataChanged(_) => "metadata_changed",
            Self::Driver(_) => "driver",
            Self::Shutdown { .. } => "shutdown",
        }
    }

    pub fn is_shutdown(&self) -> bool {
        matches!(self, Self::Shutdown { .. })
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tune { frequency, .. } => write!(f, "Tune({})", frequency),
            Self::StartSearch { max_stations, .. } => write!(f, "StartSearch({})", max_stations),
            Self::Driver(event) => write!(f, "Driver({:?})", event),
            Self::MetadataChanged(metadata) => write!(f, "MetadataChanged({:?})", metadata),
            other => f.write_str(other.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radio_text_format() {
        let metadata = TrackMetadata::new("Artist", "Album", "Track");
        assert_eq!(metadata.radio_text(), "Album:Track:Artist");
    }

    #[test]
    fn test_message_labels() {
        let (tx, _rx) = oneshot::channel();
        assert_eq!(Message::TurnOn { reply: tx }.label(), "turn_on");
        assert_eq!(Message::Bind.label(), "bind");
        assert_eq!(
            Message::Driver(DriverEvent::SearchListComplete).label(),
            "driver"
        );
        assert!(Message::Shutdown { reply: None }.is_shutdown());
    }

    #[test]
    fn test_debug_includes_payload() {
        let (tx, _rx) = oneshot::channel();
        let msg = Message::Tune {
            frequency: Frequency::from_khz(91_500),
            reply: tx,
        };
        assert_eq!(format!("{:?}", msg), "Tune(91.5 MHz)");
        assert_eq!(format!("{:?}", Message::Unbind), "unbind");
    }
}
