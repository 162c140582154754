use crux_core::{render::render, Command};
use serde::{Deserialize, Serialize};

use crate::events::{Event, UiEvent};
use crate::types::*;
use crate::{Effect, TimerCmd};

/// Application Model - the complete state
///
/// Replaces the page markup as the state store: rooms, transcript, connection
/// status and toast live here and `view::project` turns them into a ViewModel.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Model {
    // Light state, in display order
    pub rooms: Vec<RoomLight>,

    // Realtime state
    pub connection: ConnectionStatus,

    // UI state
    pub notification: NotificationState,
    pub chat: ChatState,
    pub is_loading: bool,

    /// Display time of the latest clock tick, stamped onto chat messages
    pub clock: String,
    pub last_update: Option<String>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            rooms: DEFAULT_ROOMS.iter().map(|room| RoomLight::new(*room)).collect(),
            connection: ConnectionStatus::default(),
            notification: NotificationState::default(),
            chat: ChatState::default(),
            is_loading: false,
            clock: String::new(),
            last_update: None,
        }
    }
}

impl Model {
    /// Replace the known room set. Keeps the state of rooms that remain.
    pub fn set_rooms(&mut self, rooms: Vec<String>) {
        let mut keys: Vec<String> = Vec::with_capacity(rooms.len());
        for room in rooms.iter().map(|room| normalize_room(room)) {
            if !room.is_empty() && room != ALL_ROOMS && !keys.contains(&room) {
                keys.push(room);
            }
        }
        if keys.is_empty() {
            keys = DEFAULT_ROOMS.iter().map(|room| room.to_string()).collect();
        }

        let previous = std::mem::take(&mut self.rooms);
        self.rooms = keys
            .into_iter()
            .map(|room| {
                previous
                    .iter()
                    .find(|light| light.room == room)
                    .cloned()
                    .unwrap_or_else(|| RoomLight::new(room))
            })
            .collect();
    }

    pub fn room(&self, room: &str) -> Option<&RoomLight> {
        self.rooms.iter().find(|light| light.room == room)
    }

    pub fn room_mut(&mut self, room: &str) -> Option<&mut RoomLight> {
        self.rooms.iter_mut().find(|light| light.room == room)
    }

    pub fn lights_on(&self) -> usize {
        self.rooms.iter().filter(|light| light.is_on).count()
    }

    /// Show a toast, schedule its auto-hide and return the render command
    pub fn notify(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
    ) -> Command<Effect, Event> {
        self.notification.show(message, severity);
        Command::all([
            render(),
            TimerCmd::after(NOTIFICATION_TTL_MS)
                .build()
                .then_send(|_| Event::Ui(UiEvent::HideNotification)),
        ])
    }
}
