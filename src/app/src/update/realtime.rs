use crux_core::{render::render, Command};

use crate::commands::realtime::RealtimeOutput;
use crate::events::{Event, RealtimeEvent};
use crate::model::Model;
use crate::types::*;
use crate::update::lights::apply_change;
use crate::{Effect, RealtimeCmd};

/// Ask the shell to open the push channel
pub fn connect() -> Command<Effect, Event> {
    RealtimeCmd::connect()
        .build()
        .then_send(|output| Event::Realtime(RealtimeEvent::OperationResult(output)))
}

/// Handle realtime channel events
pub fn handle(event: RealtimeEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        RealtimeEvent::Connect => connect(),

        RealtimeEvent::Disconnect => RealtimeCmd::disconnect()
            .build()
            .then_send(|output| Event::Realtime(RealtimeEvent::OperationResult(output))),

        RealtimeEvent::OperationResult(output) => match output {
            RealtimeOutput::Started => Command::done(),
            RealtimeOutput::Stopped => set_status(model, ConnectionState::Disconnected, "Disconnected"),
            RealtimeOutput::Error { message } => {
                log::error!("realtime channel: {message}");
                set_status(model, ConnectionState::Disconnected, "Disconnected")
            }
        },

        RealtimeEvent::Connected => {
            log::info!("connected to server");
            set_status(model, ConnectionState::Connected, "Connected")
        }
        RealtimeEvent::Disconnected => {
            log::warn!("disconnected from server");
            set_status(model, ConnectionState::Disconnected, "Disconnected")
        }
        RealtimeEvent::Reconnected => {
            log::info!("reconnected to server");
            set_status(model, ConnectionState::Connected, "Reconnected")
        }

        RealtimeEvent::LightChanged(change) => {
            let source = LightSource::from_tag(&change.source);
            apply_change(model, &change.room, change.state, source)
        }
    }
}

fn set_status(model: &mut Model, state: ConnectionState, label: &str) -> Command<Effect, Event> {
    if model.connection.state == state && model.connection.label == label {
        return Command::done();
    }
    model.connection.update(state, label);
    render()
}
