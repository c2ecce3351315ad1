//! Message processing
//!
//! Routes one queued message to the session controller and answers its
//! reply channel. A dropped reply receiver only means the caller stopped
//! waiting; the operation has already taken effect.

use fmtx_core::prelude::*;

use crate::controller::SessionController;
use crate::message::{Message, Reply};

/// Process a single message against the controller
pub async fn process_message(controller: &mut SessionController, message: Message) {
    trace!("Processing message: {}", message.label());

    match message {
        Message::TurnOn { reply } => respond(reply, controller.turn_on().await),
        Message::TurnOff { reply } => respond(reply, controller.turn_off()),
        Message::Restart { reply } => respond(reply, controller.restart().await),
        Message::Reconfigure { reply } => respond(reply, controller.reconfigure()),
        Message::Tune { frequency, reply } => respond(reply, controller.tune(frequency)),
        Message::StartSearch {
            max_stations,
            reply,
        } => respond(reply, controller.start_search(max_stations).await),
        Message::CancelSearch { reply } => respond(reply, controller.cancel_search()),

        Message::Bind => controller.bind(),
        Message::Unbind => controller.unbind(),
        Message::RegisterListener(listener) => controller.register_listener(listener),
        Message::UnregisterListener => controller.unregister_listener(),

        Message::Status { reply } => respond(reply, controller.status()),
        Message::SearchList { reply } => respond(reply, controller.search_list()),
        Message::InternalAntenna { reply } => {
            respond(reply, controller.is_internal_antenna_available())
        }

        Message::CallStateChanged {
            line,
            state,
            ring_volume,
        } => {
            controller.set_call_state(line, state, ring_volume).await;
        }
        Message::HeadsetPlugChanged { plugged } => {
            controller.set_headset_plugged(plugged).await;
        }
        Message::A2dpStateChanged { playing, connected } => {
            controller.set_a2dp_state(playing, connected).await;
        }
        Message::HdmiConnectionChanged { connected } => {
            controller.set_hdmi_connected(connected).await;
        }
        Message::MetadataChanged(metadata) => controller.on_metadata_changed(&metadata),

        Message::Driver(event) => controller.on_driver_event(event),

        Message::Shutdown { reply } => {
            controller.shutdown();
            if let Some(reply) = reply {
                respond(reply, ());
            }
        }
    }
}

fn respond<T>(reply: Reply<T>, value: T) {
    if reply.send(value).is_err() {
        debug!("Reply dropped: caller no longer waiting");
    }
}
