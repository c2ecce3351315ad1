//! Client callback sink
//!
//! At most one client listener is registered at a time. Deliveries are best
//! effort: a listener that has gone away is logged and otherwise ignored, and
//! never changes the session state.

use std::sync::Arc;

use fmtx_core::prelude::*;
use fmtx_core::Frequency;

/// Callbacks delivered to the bound client.
///
/// Returning `Err` (typically [`Error::ClientGone`]) marks the delivery as
/// failed; the controller logs it and carries on.
#[cfg_attr(test, mockall::automock)]
pub trait ClientListener: Send + Sync {
    fn on_enabled(&self, success: bool) -> Result<()>;

    fn on_disabled(&self) -> Result<()>;

    fn on_tune_status_changed(&self, frequency: Frequency) -> Result<()>;

    fn on_search_list_complete(&self, success: bool) -> Result<()>;

    fn on_ps_info_sent(&self, text: &str) -> Result<()>;

    fn on_meta_data_changed(&self, text: &str) -> Result<()>;

    fn on_reconfigured(&self) -> Result<()>;
}

/// Holder for the single registered listener
#[derive(Default, Clone)]
pub struct ListenerSlot {
    listener: Option<Arc<dyn ClientListener>>,
}

impl std::fmt::Debug for ListenerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSlot")
            .field("registered", &self.is_registered())
            .finish()
    }
}

impl ListenerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`, replacing any previous one
    pub fn register(&mut self, listener: Arc<dyn ClientListener>) {
        if self.listener.replace(listener).is_some() {
            debug!("Replacing previously registered client listener");
        }
    }

    pub fn unregister(&mut self) {
        self.listener = None;
    }

    pub fn is_registered(&self) -> bool {
        self.listener.is_some()
    }

    pub fn enabled(&self, success: bool) {
        self.deliver("onEnabled", |l| l.on_enabled(success));
    }

    pub fn disabled(&self) {
        self.deliver("onDisabled", |l| l.on_disabled());
    }

    pub fn tune_status_changed(&self, frequency: Frequency) {
        self.deliver("onTuneStatusChanged", |l| l.on_tune_status_changed(frequency));
    }

    pub fn search_list_complete(&self, success: bool) {
        self.deliver("onSearchListComplete", |l| l.on_search_list_complete(success));
    }

    pub fn ps_info_sent(&self, text: &str) {
        self.deliver("onPSInfoSent", |l| l.on_ps_info_sent(text));
    }

    pub fn meta_data_changed(&self, text: &str) {
        self.deliver("onMetaDataChanged", |l| l.on_meta_data_changed(text));
    }

    pub fn reconfigured(&self) {
        self.deliver("onReconfigured", |l| l.on_reconfigured());
    }

    fn deliver<F>(&self, callback: &'static str, f: F)
    where
        F: FnOnce(&dyn ClientListener) -> Result<()>,
    {
        let Some(listener) = self.listener.as_deref() else {
            trace!("No client listener for {}", callback);
            return;
        };
        if let Err(e) = f(listener) {
            warn!("Failed to deliver {} to client: {}", callback, e);
        }
    }
}
