//! Terminal rendering of the ViewModel.
//!
//! Only the sections that changed since the previous frame are printed, so
//! the output reads like a log of what happened on the dashboard.

use smarthome_ui_core::{
    Sender,
    view::{ChatMessageView, ViewModel},
};
use std::fmt::Write;

#[derive(Default)]
pub struct Renderer {
    previous: Option<ViewModel>,
}

impl Renderer {
    /// Text to print for `view`, or `None` when nothing visible changed
    pub fn render(&mut self, view: &ViewModel) -> Option<String> {
        let previous = self.previous.replace(view.clone());
        let previous = previous.as_ref();
        let mut out = String::new();

        if previous.is_none_or(|p| p.connection != view.connection) {
            let dot = if view.connection.pulsing { '●' } else { '○' };
            let _ = writeln!(out, "{dot} {}", view.connection.label);
        }

        if view.is_loading && previous.is_none_or(|p| !p.is_loading) {
            let _ = writeln!(out, "loading light status...");
        }

        if previous.is_none_or(|p| p.rooms != view.rooms) {
            let _ = writeln!(out, "lights: {}", view.summary);
            for room in &view.rooms {
                let _ = writeln!(out, "  [{:<3}] {}", room.indicator_text, room.name);
            }
        }

        let notification = &view.notification;
        if notification.visible
            && previous.is_none_or(|p| p.notification.sequence != notification.sequence)
        {
            let _ = writeln!(out, "[{}] {}", notification.class, notification.message);
        }

        render_chat(&mut out, previous.map(|p| p.chat.messages.as_slice()), &view.chat.messages);

        if !view.chat.input_enabled && previous.is_none_or(|p| p.chat.input_enabled) {
            let _ = writeln!(out, "(waiting for the assistant...)");
        }

        (!out.is_empty()).then_some(out)
    }
}

fn render_chat(out: &mut String, previous: Option<&[ChatMessageView]>, messages: &[ChatMessageView]) {
    let new = match previous {
        Some(previous) if messages.starts_with(previous) => &messages[previous.len()..],
        Some(_) => {
            let _ = writeln!(out, "--- chat cleared ---");
            messages
        }
        None => messages,
    };

    for message in new {
        let who = match message.sender {
            Sender::User => "you",
            Sender::Bot => "assistant",
        };
        let stamp = if message.timestamp.is_empty() {
            String::new()
        } else {
            format!("{} ", message.timestamp)
        };
        let _ = writeln!(out, "{stamp}{who}: {}", html_to_text(&message.html));
    }
}

/// Undo the chat HTML escaping for terminal output
pub fn html_to_text(html: &str) -> String {
    html.replace("<br>", "\n")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
