use smarthome_ui_core::{ALL_ROOMS, ChatEvent, Event, LightEvent, SEND_KEY, UiEvent};

pub const HELP: &str = "\
commands:
  /on ROOM      turn a light on (ROOM may be 'all')
  /off ROOM     turn a light off (ROOM may be 'all')
  /refresh      reload the state of every light
  /clear        clear the chat
  /help         show this help
  /quit         exit
anything else is sent to the assistant";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Dispatch(Event),
    Help,
    Quit,
    Invalid(String),
}

/// Parse one line of terminal input. Blank lines yield `None`.
pub fn parse(line: &str) -> Option<InputAction> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let Some(command) = line.strip_prefix('/') else {
        // typed into the chat input and confirmed with Enter
        return Some(InputAction::Dispatch(Event::Ui(UiEvent::KeyPressed {
            key: SEND_KEY.to_string(),
            ctrl: false,
            chat_input: Some(line.to_string()),
        })));
    };

    let mut words = command.split_whitespace();
    let action = match (words.next(), words.next(), words.next()) {
        (Some("on"), Some(room), None) => light(room, true),
        (Some("off"), Some(room), None) => light(room, false),
        (Some("on" | "off"), _, _) => InputAction::Invalid("usage: /on ROOM or /off ROOM".into()),
        (Some("refresh"), None, _) => InputAction::Dispatch(Event::Light(LightEvent::Refresh)),
        (Some("clear"), None, _) => InputAction::Dispatch(Event::Chat(ChatEvent::Clear)),
        (Some("help"), None, _) => InputAction::Help,
        (Some("quit" | "exit"), None, _) => InputAction::Quit,
        _ => InputAction::Invalid(format!("unknown command '{line}', try /help")),
    };
    Some(action)
}

fn light(room: &str, on: bool) -> InputAction {
    let event = if room.eq_ignore_ascii_case(ALL_ROOMS) {
        LightEvent::SetAllLights { on }
    } else {
        LightEvent::SetLight {
            room: room.to_string(),
            on,
        }
    };
    InputAction::Dispatch(Event::Light(event))
}
