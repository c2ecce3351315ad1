//! Test utilities for the controller and engine
//!
//! Only compiled in test builds or with the `test-helpers` feature.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use fmtx_core::prelude::*;
use fmtx_core::Frequency;

use crate::listener::ClientListener;

/// One delivered client callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Enabled(bool),
    Disabled,
    TuneStatusChanged(Frequency),
    SearchListComplete(bool),
    PsInfoSent(String),
    MetaDataChanged(String),
    Reconfigured,
}

/// Client listener that records every callback in order.
///
/// With [`set_gone`](Self::set_gone) every delivery fails with
/// `Error::ClientGone` but is still recorded.
#[derive(Debug, Default)]
pub struct RecordingListener {
    received: Mutex<Vec<Notification>>,
    gone: AtomicBool,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_gone(&self, gone: bool) {
        self.gone.store(gone, Ordering::SeqCst);
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn count(&self, notification: &Notification) -> usize {
        self.notifications()
            .iter()
            .filter(|n| *n == notification)
            .count()
    }

    pub fn clear(&self) {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    fn record(&self, notification: Notification) -> Result<()> {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
        if self.gone.load(Ordering::SeqCst) {
            Err(Error::ClientGone)
        } else {
            Ok(())
        }
    }
}

impl ClientListener for RecordingListener {
    fn on_enabled(&self, success: bool) -> Result<()> {
        self.record(Notification::Enabled(success))
    }

    fn on_disabled(&self) -> Result<()> {
        self.record(Notification::Disabled)
    }

    fn on_tune_status_changed(&self, frequency: Frequency) -> Result<()> {
        self.record(Notification::TuneStatusChanged(frequency))
    }

    fn on_search_list_complete(&self, success: bool) -> Result<()> {
        self.record(Notification::SearchListComplete(success))
    }

    fn on_ps_info_sent(&self, text: &str) -> Result<()> {
        self.record(Notification::PsInfoSent(text.to_string()))
    }

    fn on_meta_data_changed(&self, text: &str) -> Result<()> {
        self.record(Notification::MetaDataChanged(text.to_string()))
    }

    fn on_reconfigured(&self) -> Result<()> {
        self.record(Notification::Reconfigured)
    }
}
