use serde::{Deserialize, Serialize};

/// First transcript entry, also used to reseed the transcript on clear
pub const GREETING: &str = "👋 Hello! I'm your smart home assistant. I can control your lights and more. How can I help you today?";

/// Bot line appended when the chat request fails
pub const CHAT_FALLBACK: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    #[default]
    User,
    Bot,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
    /// Display only
    pub timestamp: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            timestamp: timestamp.into(),
        }
    }

    pub fn bot(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
            timestamp: timestamp.into(),
        }
    }

    /// Message text as HTML: markup is escaped, newlines become line breaks
    pub fn html(&self) -> String {
        render_html(&self.text)
    }
}

/// Request body of `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
}

/// Response body of `POST /api/chat`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    #[serde(default)]
    pub response: String,
}

/// Token of one chat exchange. A reply carrying any other token is stale.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct ActionId(pub u64);

/// Chat panel state (UI state)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatState {
    pub transcript: Vec<ChatMessage>,
    pending: Option<ActionId>,
    next_action: u64,
    focus_generation: u64,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            transcript: vec![ChatMessage::bot(GREETING, "")],
            pending: None,
            next_action: 0,
            focus_generation: 0,
        }
    }
}

impl ChatState {
    /// Input is disabled while an exchange is in flight
    pub fn input_enabled(&self) -> bool {
        self.pending.is_none()
    }

    pub fn pending(&self) -> Option<ActionId> {
        self.pending
    }

    /// Start an exchange and return its token
    pub fn begin(&mut self) -> ActionId {
        self.next_action += 1;
        let action = ActionId(self.next_action);
        self.pending = Some(action);
        action
    }

    /// Finish the exchange identified by `action`.
    ///
    /// Returns `false` for a stale token, leaving the state untouched.
    pub fn finish(&mut self, action: ActionId) -> bool {
        if self.pending != Some(action) {
            return false;
        }
        self.pending = None;
        true
    }

    /// Discard the transcript and cancel any exchange in flight
    pub fn reset(&mut self, timestamp: impl Into<String>) {
        self.transcript = vec![ChatMessage::bot(GREETING, timestamp)];
        self.pending = None;
    }

    pub fn request_focus(&mut self) {
        self.focus_generation += 1;
    }

    /// Shells move focus to the chat input whenever this changes
    pub fn focus_generation(&self) -> u64 {
        self.focus_generation
    }
}

/// Escape HTML special characters and turn newlines into `<br>`
pub fn render_html(text: &str) -> String {
    let mut html = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => html.push_str("&amp;"),
            '<' => html.push_str("&lt;"),
            '>' => html.push_str("&gt;"),
            '"' => html.push_str("&quot;"),
            '\'' => html.push_str("&#39;"),
            '\n' => html.push_str("<br>"),
            '\r' => {}
            c => html.push(c),
        }
    }
    html
}
