use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rooms of the reference installation, used when the shell configures none
pub const DEFAULT_ROOMS: [&str; 4] = ["hall", "bedroom", "kitchen", "bathroom"];

/// Pseudo room addressing every light at once
pub const ALL_ROOMS: &str = "all";

/// Actor that caused a light transition
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LightSource {
    /// Bulk synchronisation (status fetch, server replay on connect)
    #[default]
    System,
    User,
    Automation,
    Chatbot,
}

impl LightSource {
    /// Map a wire tag onto a source.
    ///
    /// The backend tags manual commands as `web` (dashboard) or `button`
    /// (wall switch); both count as user changes. Anything unrecognized is
    /// treated as a silent system change.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "system" | "" => Self::System,
            "user" | "web" | "button" => Self::User,
            "automation" => Self::Automation,
            "chatbot" => Self::Chatbot,
            other => {
                log::warn!("unknown light source '{other}', treating as system");
                Self::System
            }
        }
    }

    /// Whether a change from this source raises a notification
    pub fn notifies(self) -> bool {
        matches!(self, Self::Automation | Self::Chatbot)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Automation => "automation",
            Self::Chatbot => "chatbot",
        }
    }
}

/// Last known state of one room's light
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomLight {
    pub room: String,
    pub is_on: bool,
    /// `None` until the first update for this room arrives
    pub source: Option<LightSource>,
}

impl RoomLight {
    pub fn new(room: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            is_on: false,
            source: None,
        }
    }

    /// Overwrite the state; last write wins
    pub fn set(&mut self, is_on: bool, source: LightSource) {
        self.is_on = is_on;
        self.source = Some(source);
    }

    pub fn display_name(&self) -> String {
        display_name(&self.room)
    }
}

/// Room keys are lowercase identifiers on the wire
pub fn normalize_room(room: &str) -> String {
    room.trim().to_lowercase()
}

/// Human readable room name ("kitchen" -> "Kitchen")
pub fn display_name(room: &str) -> String {
    let mut chars = room.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Path segment for a desired light state
pub fn state_segment(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

/// Indicator text for a light state
pub fn state_label(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

/// `light_changed` push payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LightChange {
    pub room: String,
    pub state: bool,
    #[serde(default)]
    pub source: String,
}

/// Response body of `POST /api/light/{room}/{on|off}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LightCommandResponse {
    #[serde(default)]
    pub error: Option<String>,
}

/// Response body of `GET /api/lights/status`
pub type LightsStatus = BTreeMap<String, bool>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_and_button_sources_are_user_changes() {
        assert_eq!(LightSource::from_tag("web"), LightSource::User);
        assert_eq!(LightSource::from_tag("button"), LightSource::User);
        assert_eq!(LightSource::from_tag("User"), LightSource::User);
    }

    #[test]
    fn unknown_source_is_silent() {
        let source = LightSource::from_tag("scheduler");
        assert_eq!(source, LightSource::System);
        assert!(!source.notifies());
    }

    #[test]
    fn only_automatic_sources_notify() {
        assert!(LightSource::Automation.notifies());
        assert!(LightSource::Chatbot.notifies());
        assert!(!LightSource::System.notifies());
        assert!(!LightSource::User.notifies());
    }

    #[test]
    fn display_name_capitalizes() {
        assert_eq!(display_name("kitchen"), "Kitchen");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn light_change_without_source_parses() {
        let change: LightChange =
            serde_json::from_str(r#"{"room":"hall","state":true}"#).unwrap();
        assert_eq!(change.room, "hall");
        assert!(change.state);
        assert!(change.source.is_empty());
    }

    #[test]
    fn command_response_ignores_extra_fields() {
        let response: LightCommandResponse =
            serde_json::from_str(r#"{"room":"hall","state":true}"#).unwrap();
        assert_eq!(response.error, None);
    }
}
