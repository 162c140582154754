//! Projection of the Model into what the shells draw.
//!
//! Shells never derive presentation from the Model themselves: card classes,
//! icons, indicator text and the escaped chat HTML are all decided here.

use serde::{Deserialize, Serialize};

use crate::model::Model;
use crate::types::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub rooms: Vec<RoomCardView>,
    /// "N of M lights on"
    pub summary: String,
    pub connection: ConnectionView,
    pub notification: NotificationView,
    pub chat: ChatView,
    pub is_loading: bool,
    pub last_update: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomCardView {
    pub room: String,
    pub name: String,
    pub is_on: bool,
    pub card_class: String,
    pub indicator_text: String,
    pub icon: String,
    pub source: Option<LightSource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionView {
    pub class: String,
    pub label: String,
    /// Status dot animates while connected
    pub pulsing: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationView {
    pub visible: bool,
    pub message: String,
    pub severity: Severity,
    pub icon: String,
    pub class: String,
    /// Increments with every toast shown, so shells can restart animations
    pub sequence: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessageView {
    pub sender: Sender,
    pub class: String,
    pub html: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatView {
    pub messages: Vec<ChatMessageView>,
    pub input_enabled: bool,
    pub focus_generation: u64,
}

pub fn project(model: &Model) -> ViewModel {
    ViewModel {
        rooms: model.rooms.iter().map(room_card).collect(),
        summary: format!("{} of {} lights on", model.lights_on(), model.rooms.len()),
        connection: ConnectionView {
            class: model.connection.class().to_string(),
            label: model.connection.label.clone(),
            pulsing: model.connection.is_connected(),
        },
        notification: notification_view(&model.notification),
        chat: ChatView {
            messages: model.chat.transcript.iter().map(chat_message).collect(),
            input_enabled: model.chat.input_enabled(),
            focus_generation: model.chat.focus_generation(),
        },
        is_loading: model.is_loading,
        last_update: model.last_update.clone(),
    }
}

fn room_card(light: &RoomLight) -> RoomCardView {
    let (card_class, icon) = if light.is_on {
        ("light-card active", "fas fa-lightbulb")
    } else {
        ("light-card", "far fa-lightbulb")
    };

    RoomCardView {
        room: light.room.clone(),
        name: light.display_name(),
        is_on: light.is_on,
        card_class: card_class.to_string(),
        indicator_text: state_label(light.is_on).to_string(),
        icon: icon.to_string(),
        source: light.source,
    }
}

fn notification_view(state: &NotificationState) -> NotificationView {
    let (message, severity) = state
        .current()
        .map(|n| (n.message.clone(), n.severity))
        .unwrap_or_default();

    NotificationView {
        visible: state.is_visible(),
        message,
        severity,
        icon: severity.icon().to_string(),
        class: severity.class().to_string(),
        sequence: state.shown(),
    }
}

fn chat_message(message: &ChatMessage) -> ChatMessageView {
    let class = match message.sender {
        Sender::User => "message user-message",
        Sender::Bot => "message bot-message",
    };

    ChatMessageView {
        sender: message.sender,
        class: class.to_string(),
        html: message.html(),
        timestamp: message.timestamp.clone(),
    }
}
