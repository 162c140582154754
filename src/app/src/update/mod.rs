mod chat;
mod dispatch;
mod lights;
mod realtime;
mod ui;

pub use dispatch::GENERIC_ERROR;
pub use lights::STATUS_ERROR;
pub use ui::{FOCUS_CHAT_KEY, SEND_KEY};

use crux_core::{render::render, Command};

use crate::events::{Event, LightEvent};
use crate::model::Model;
use crate::Effect;

/// Main update dispatcher - routes events to domain-specific handlers
pub fn update(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        // Initialization
        Event::Initialize { rooms } => {
            model.set_rooms(rooms);
            Command::all([
                render(),
                lights::handle(LightEvent::Refresh, model),
                realtime::connect(),
            ])
        }

        // Light domain: renderer for state, dispatcher for commands
        Event::Light(
            event @ (LightEvent::Refresh | LightEvent::StatusResponse(_)),
        ) => lights::handle(event, model),
        Event::Light(event) => dispatch::handle(event, model),

        Event::Chat(event) => chat::handle(event, model),
        Event::Realtime(event) => realtime::handle(event, model),
        Event::Ui(event) => ui::handle(event, model),
    }
}
