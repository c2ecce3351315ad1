//! Controller state (the model mutated by the session controller)

use fmtx_core::{Frequency, SessionState};

use crate::interrupts::InterruptTracker;
use crate::transition::TransitionInput;

/// Everything the session controller owns besides its device handles.
#[derive(Debug, Default)]
pub struct ControllerState {
    /// Logical mode; always matches the enabled hardware device
    pub session: SessionState,

    /// Set when an interruption forced On -> Off, cleared by the resume or
    /// by an explicit turn-off
    pub resume_after_interrupt: bool,

    /// Last frequency accepted by `tune()` or reported by the transmitter
    pub tuned_frequency: Option<Frequency>,

    /// A client is bound to the controller
    pub client_bound: bool,

    /// Raw interruption source flags
    pub interrupts: InterruptTracker,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the facts the transition function needs
    pub fn transition_input(&self, listener_registered: bool) -> TransitionInput {
        TransitionInput {
            interrupts: self.interrupts.snapshot(),
            session: self.session,
            resume_after_interrupt: self.resume_after_interrupt,
            client_present: self.client_bound && listener_registered,
        }
    }
}
