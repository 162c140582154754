use serde::{Deserialize, Serialize};

use crate::commands::realtime::RealtimeOutput;
use crate::types::*;

/// Events that can happen in the app
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Event {
    /// Page load: set the known rooms, fetch the full state, open the push channel.
    /// An empty room list falls back to [`DEFAULT_ROOMS`].
    Initialize {
        rooms: Vec<String>,
    },

    Light(LightEvent),
    Chat(ChatEvent),
    Realtime(RealtimeEvent),
    Ui(UiEvent),
}

/// Light state and light commands
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum LightEvent {
    /// Re-fetch the state of every room
    Refresh,
    SetLight {
        room: String,
        on: bool,
    },
    SetAllLights {
        on: bool,
    },

    // HTTP responses (internal events, skipped from serialization)
    #[serde(skip)]
    StatusResponse(Result<LightsStatus, String>),
    #[serde(skip)]
    SetLightResponse {
        room: String,
        on: bool,
        result: Result<LightCommandResponse, String>,
    },
    #[serde(skip)]
    SetAllLightsResponse {
        on: bool,
        result: Result<LightCommandResponse, String>,
    },
}

/// Chat panel
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Send {
        text: String,
    },
    Clear,

    #[serde(skip)]
    Reply {
        action: ActionId,
        result: Result<ChatReply, String>,
    },
}

/// Realtime channel
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum RealtimeEvent {
    Connect,
    Disconnect,

    // Lifecycle signals and pushes (sent by the shell)
    Connected,
    Disconnected,
    Reconnected,
    LightChanged(LightChange),

    #[serde(skip)]
    OperationResult(RealtimeOutput),
}

/// UI actions
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Periodic clock refresh with the current display time
    Tick {
        time: String,
    },
    /// Raw key press. `chat_input` carries the input's text when the chat
    /// input has focus.
    KeyPressed {
        key: String,
        ctrl: bool,
        chat_input: Option<String>,
    },
    FocusChat,
    HideNotification,
}
