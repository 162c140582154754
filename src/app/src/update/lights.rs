use crux_core::{render::render, Command};

use crate::build_url;
use crate::events::{Event, LightEvent};
use crate::http_get;
use crate::model::Model;
use crate::types::*;
use crate::Effect;

pub const STATUS_ERROR: &str = "Failed to load light status";

/// Handle light state events (bulk fetch)
pub fn handle(event: LightEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        LightEvent::Refresh => {
            model.is_loading = true;
            Command::all([
                render(),
                http_get!(
                    Light,
                    LightEvent,
                    build_url("/api/lights/status"),
                    StatusResponse,
                    LightsStatus
                ),
            ])
        }

        LightEvent::StatusResponse(result) => {
            model.is_loading = false;
            match result {
                Ok(status) => {
                    for (room, is_on) in status {
                        let key = normalize_room(&room);
                        match model.room_mut(&key) {
                            Some(light) => light.set(is_on, LightSource::System),
                            None => log::warn!("status for unconfigured room '{room}' ignored"),
                        }
                    }
                    render()
                }
                Err(e) => {
                    log::error!("{e}");
                    model.notify(STATUS_ERROR, Severity::Error)
                }
            }
        }

        _ => unreachable!("light command passed to light state handler"),
    }
}

/// Apply one room update and notify about automatic changes.
///
/// An update for a room outside the configured set is a configuration error:
/// it is logged and dropped.
pub fn apply_change(
    model: &mut Model,
    room: &str,
    is_on: bool,
    source: LightSource,
) -> Command<Effect, Event> {
    let key = normalize_room(room);

    let name = if key == ALL_ROOMS {
        for light in &mut model.rooms {
            light.set(is_on, source);
        }
        "All".to_string()
    } else {
        let Some(light) = model.room_mut(&key) else {
            log::error!("light update for unknown room '{room}'");
            return Command::done();
        };
        light.set(is_on, source);
        light.display_name()
    };

    log::debug!(
        "{key} light {} (source: {})",
        state_label(is_on),
        source.as_str()
    );

    if source.notifies() {
        model.notify(change_message(&name, is_on, source), Severity::Info)
    } else {
        render()
    }
}

fn change_message(name: &str, is_on: bool, source: LightSource) -> String {
    let lights = if name == "All" { "lights" } else { "light" };
    let actor = match source {
        LightSource::Chatbot => "by the assistant",
        _ => "automatically",
    };
    format!("{name} {lights} turned {} {actor}", state_label(is_on))
}
