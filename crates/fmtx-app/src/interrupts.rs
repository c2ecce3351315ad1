//! Interruption source tracking
//!
//! Owns the raw flags of every source that can force the transmitter off:
//! calls (one flag per telephony line), a wired headset, A2DP playback and
//! HDMI. Every setter reports the new snapshot only when its flag actually
//! changed, so one real-world transition produces at most one signal.

use std::collections::BTreeMap;

use fmtx_core::{CallState, InterruptLevel, InterruptSnapshot};

/// Telephony line (subscription) index
pub type LineId = usize;

#[derive(Debug, Default, Clone)]
pub struct InterruptTracker {
    call_lines: BTreeMap<LineId, bool>,
    headset_plugged: bool,
    a2dp_playing: bool,
    hdmi_connected: bool,
}

impl InterruptTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the call state of one line.
    ///
    /// The aggregate call flag is the OR over all lines. A line that is
    /// ringing with `ring_volume == 0` does not count as active.
    pub fn set_call_state(
        &mut self,
        line: LineId,
        state: CallState,
        ring_volume: u32,
    ) -> Option<InterruptSnapshot> {
        let before = self.call_active();
        self.call_lines.insert(line, state.interrupts(ring_volume));
        self.changed(before != self.call_active())
    }

    pub fn set_headset_plugged(&mut self, plugged: bool) -> Option<InterruptSnapshot> {
        let changed = std::mem::replace(&mut self.headset_plugged, plugged) != plugged;
        self.changed(changed)
    }

    pub fn set_a2dp_playing(&mut self, playing: bool) -> Option<InterruptSnapshot> {
        let changed = std::mem::replace(&mut self.a2dp_playing, playing) != playing;
        self.changed(changed)
    }

    pub fn set_hdmi_connected(&mut self, connected: bool) -> Option<InterruptSnapshot> {
        let changed = std::mem::replace(&mut self.hdmi_connected, connected) != connected;
        self.changed(changed)
    }

    /// Whether any line is ringing (audibly) or off-hook
    pub fn call_active(&self) -> bool {
        self.call_lines.values().any(|active| *active)
    }

    pub fn headset_plugged(&self) -> bool {
        self.headset_plugged
    }

    pub fn snapshot(&self) -> InterruptSnapshot {
        InterruptSnapshot {
            call_active: self.call_active(),
            headset_plugged: self.headset_plugged,
            a2dp_playing: self.a2dp_playing,
            hdmi_connected: self.hdmi_connected,
        }
    }

    pub fn level(&self) -> InterruptLevel {
        self.snapshot().level()
    }

    fn changed(&self, changed: bool) -> Option<InterruptSnapshot> {
        changed.then(|| self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_clear() {
        let tracker = InterruptTracker::new();
        assert_eq!(tracker.level(), InterruptLevel::Clear);
        assert!(!tracker.call_active());
    }

    #[test]
    fn test_setter_signals_only_on_change() {
        let mut tracker = InterruptTracker::new();
        assert!(tracker.set_headset_plugged(false).is_none());

        let snap = tracker.set_headset_plugged(true).unwrap();
        assert!(snap.headset_plugged);
        assert_eq!(snap.level(), InterruptLevel::Raised);

        assert!(tracker.set_headset_plugged(true).is_none());
        assert!(tracker.set_headset_plugged(false).is_some());
    }

    #[test]
    fn test_silent_ring_is_exempt() {
        let mut tracker = InterruptTracker::new();
        assert!(tracker.set_call_state(0, CallState::Ringing, 0).is_none());
        assert_eq!(tracker.level(), InterruptLevel::Clear);

        let snap = tracker.set_call_state(0, CallState::Ringing, 4).unwrap();
        assert!(snap.call_active);
    }

    #[test]
    fn test_call_lines_are_ored() {
        let mut tracker = InterruptTracker::new();
        assert!(tracker.set_call_state(0, CallState::Offhook, 0).is_some());
        // Second line ringing does not change the aggregate
        assert!(tracker.set_call_state(1, CallState::Ringing, 3).is_none());
        // First line hangs up, second still ringing
        assert!(tracker.set_call_state(0, CallState::Idle, 0).is_none());
        assert!(tracker.call_active());

        let snap = tracker.set_call_state(1, CallState::Idle, 3).unwrap();
        assert!(!snap.call_active);
        assert_eq!(snap.level(), InterruptLevel::Clear);
    }

    #[test]
    fn test_level_tracks_latest_flags() {
        let mut tracker = InterruptTracker::new();
        tracker.set_a2dp_playing(true);
        tracker.set_hdmi_connected(true);
        tracker.set_a2dp_playing(false);
        assert_eq!(tracker.level(), InterruptLevel::Raised);

        let snap = tracker.set_hdmi_connected(false).unwrap();
        assert_eq!(snap, InterruptSnapshot::default());
        assert_eq!(snap.level(), InterruptLevel::Clear);
    }

    #[test]
    fn test_level_equals_or_of_flags_for_every_sequence() {
        // Drive every 4-bit pattern through the setters, from every start pattern
        for start in 0u8..16 {
            for target in 0u8..16 {
                let mut tracker = InterruptTracker::new();
                apply(&mut tracker, start);
                apply(&mut tracker, target);

                let expected = if target == 0 {
                    InterruptLevel::Clear
                } else {
                    InterruptLevel::Raised
                };
                assert_eq!(tracker.level(), expected, "start={start:04b} target={target:04b}");
            }
        }
    }

    fn apply(tracker: &mut InterruptTracker, bits: u8) {
        let call = if bits & 1 != 0 {
            CallState::Offhook
        } else {
            CallState::Idle
        };
        tracker.set_call_state(0, call, 5);
        tracker.set_headset_plugged(bits & 2 != 0);
        tracker.set_a2dp_playing(bits & 4 != 0);
        tracker.set_hdmi_connected(bits & 8 != 0);
    }
}
