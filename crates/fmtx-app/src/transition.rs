//! Desired-mode derivation
//!
//! One pure function decides what an interrupt-changed signal should do,
//! given the full interrupt snapshot and the controller's current view.
//! All four interruption sources go through here; there are no per-source
//! special cases.

use fmtx_core::{InterruptLevel, InterruptSnapshot, SessionState};

/// Controller facts the decision depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionInput {
    pub interrupts: InterruptSnapshot,
    pub session: SessionState,
    pub resume_after_interrupt: bool,
    /// A client is bound and its listener is registered
    pub client_present: bool,
}

/// What the controller must do in response to an interrupt-changed signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Leave the hardware alone
    None,
    /// Force the transmitter off and remember to resume
    Suspend,
    /// Turn the transmitter back on
    Resume,
}

/// Derive the transition for an interrupt-changed signal.
///
/// | level  | session | resume intent | client | result  |
/// |--------|---------|---------------|--------|---------|
/// | raised | On      | any           | any    | Suspend |
/// | clear  | Off     | set           | yes    | Resume  |
/// | other  |         |               |        | None    |
///
/// A transmitter the client switched off itself stays off when an
/// interruption clears. `Searching` is never touched.
pub fn derive_transition(input: &TransitionInput) -> Transition {
    match (input.interrupts.level(), input.session) {
        (InterruptLevel::Raised, SessionState::On) => Transition::Suspend,
        (InterruptLevel::Clear, SessionState::Off)
            if input.resume_after_interrupt && input.client_present =>
        {
            Transition::Resume
        }
        _ => Transition::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(raised: bool, session: SessionState, resume: bool, client: bool) -> TransitionInput {
        TransitionInput {
            interrupts: InterruptSnapshot {
                headset_plugged: raised,
                ..InterruptSnapshot::default()
            },
            session,
            resume_after_interrupt: resume,
            client_present: client,
        }
    }

    #[test]
    fn test_raised_while_on_suspends() {
        for client in [false, true] {
            let t = derive_transition(&input(true, SessionState::On, false, client));
            assert_eq!(t, Transition::Suspend);
        }
    }

    #[test]
    fn test_raised_while_off_or_searching_does_nothing() {
        assert_eq!(
            derive_transition(&input(true, SessionState::Off, true, true)),
            Transition::None
        );
        assert_eq!(
            derive_transition(&input(true, SessionState::Searching, false, true)),
            Transition::None
        );
    }

    #[test]
    fn test_clear_while_off_with_client_resumes() {
        assert_eq!(
            derive_transition(&input(false, SessionState::Off, true, true)),
            Transition::Resume
        );
    }

    #[test]
    fn test_clear_without_resume_intent_stays_off() {
        assert_eq!(
            derive_transition(&input(false, SessionState::Off, false, true)),
            Transition::None
        );
    }

    #[test]
    fn test_clear_without_client_stays_off() {
        assert_eq!(
            derive_transition(&input(false, SessionState::Off, true, false)),
            Transition::None
        );
    }

    #[test]
    fn test_clear_while_on_or_searching_does_nothing() {
        assert_eq!(
            derive_transition(&input(false, SessionState::On, false, true)),
            Transition::None
        );
        assert_eq!(
            derive_transition(&input(false, SessionState::Searching, true, true)),
            Transition::None
        );
    }
}
