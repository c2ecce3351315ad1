//! Asynchronous events raised by the FM driver

use crate::types::{DeviceKind, Frequency};

/// Completion callbacks from the hardware driver.
///
/// Delivered on the channel handed to the driver when a device is opened,
/// then funnelled into the controller's event queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverEvent {
    /// The device finished tuning to `frequency`
    TuneStatusChanged {
        device: DeviceKind,
        frequency: Frequency,
    },
    /// A station-list search finished
    SearchListComplete,
    /// The receiver came up (informational)
    ReceiverEnabled,
    /// The receiver went down (informational)
    ReceiverDisabled,
}

impl DriverEvent {
    /// Returns a short string label for this event type (for logging/debugging).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TuneStatusChanged { .. } => "tune_status_changed",
            Self::SearchListComplete => "search_list_complete",
            Self::ReceiverEnabled => "receiver_enabled",
            Self::ReceiverDisabled => "receiver_disabled",
        }
    }
}

/// Sender half handed to the driver for its callbacks
pub type DriverEventSender = tokio::sync::mpsc::UnboundedSender<DriverEvent>;

/// Receiver half drained by the controller's event loop
pub type DriverEventReceiver = tokio::sync::mpsc::UnboundedReceiver<DriverEvent>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_event_labels() {
        let event = DriverEvent::TuneStatusChanged {
            device: DeviceKind::Transmitter,
            frequency: Frequency::from_khz(91_500),
        };
        assert_eq!(event.event_type(), "tune_status_changed");
        assert_eq!(DriverEvent::SearchListComplete.event_type(), "search_list_complete");
    }
}
