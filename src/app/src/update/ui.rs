use crux_core::{render::render, Command};

use crate::events::{ChatEvent, Event, UiEvent};
use crate::model::Model;
use crate::update::chat;
use crate::update_field;
use crate::Effect;

/// Shortcut that moves focus to the chat input (with Ctrl)
pub const FOCUS_CHAT_KEY: &str = "/";
pub const SEND_KEY: &str = "Enter";

/// Handle UI-related events (clock, keyboard, toast)
pub fn handle(event: UiEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        UiEvent::Tick { time } => update_field!(
            model.clock, time.clone();
            model.last_update, Some(time)
        ),

        UiEvent::FocusChat => {
            model.chat.request_focus();
            render()
        }

        UiEvent::KeyPressed {
            key,
            ctrl,
            chat_input,
        } => match (key.as_str(), ctrl, chat_input) {
            (FOCUS_CHAT_KEY, true, _) => {
                model.chat.request_focus();
                render()
            }
            (SEND_KEY, false, Some(text)) => chat::handle(ChatEvent::Send { text }, model),
            _ => Command::done(),
        },

        UiEvent::HideNotification => {
            if !model.notification.is_visible() {
                return Command::done();
            }
            model.notification.hide();
            render()
        }
    }
}
