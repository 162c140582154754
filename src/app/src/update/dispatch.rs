use crux_core::Command;

use crate::events::{Event, LightEvent};
use crate::light_post;
use crate::model::Model;
use crate::types::*;
use crate::Effect;

/// Toast for failures that carry no message of their own
pub const GENERIC_ERROR: &str = "Failed to communicate with the server";

/// Handle light commands.
///
/// Commands are fire-and-forget: nothing changes on the cards until the
/// realtime push (or a later fetch) reports the new state.
pub fn handle(event: LightEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        LightEvent::SetLight { room, on } => {
            let room = normalize_room(&room);
            if room == ALL_ROOMS {
                return handle(LightEvent::SetAllLights { on }, model);
            }
            let endpoint = format!("/api/light/{room}/{}", state_segment(on));
            light_post!(endpoint, "Set light", |result| {
                Event::Light(LightEvent::SetLightResponse { room, on, result })
            })
        }

        LightEvent::SetAllLights { on } => {
            let endpoint = format!("/api/light/{ALL_ROOMS}/{}", state_segment(on));
            light_post!(endpoint, "Set all lights", |result| {
                Event::Light(LightEvent::SetAllLightsResponse { on, result })
            })
        }

        LightEvent::SetLightResponse { room, on, result } => match result {
            Ok(LightCommandResponse { error: Some(error) }) => {
                model.notify(error, Severity::Error)
            }
            // state arrives with the push
            Ok(_) => {
                log::debug!("{room} light {} accepted", state_label(on));
                Command::done()
            }
            Err(e) => {
                log::error!("{e}");
                model.notify(GENERIC_ERROR, Severity::Error)
            }
        },

        LightEvent::SetAllLightsResponse { on, result } => match result {
            Ok(LightCommandResponse { error: Some(error) }) => {
                model.notify(error, Severity::Error)
            }
            Ok(_) => model.notify(
                format!("All lights turned {}", state_label(on)),
                Severity::Success,
            ),
            Err(e) => {
                log::error!("{e}");
                model.notify(GENERIC_ERROR, Severity::Error)
            }
        },

        _ => unreachable!("light state event passed to command dispatcher"),
    }
}
