use crux_core::{render::render, Command};

use crate::build_url;
use crate::events::{ChatEvent, Event};
use crate::model::Model;
use crate::types::*;
use crate::{process_json_response, Effect, HttpCmd};

/// Handle chat panel events
pub fn handle(event: ChatEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        ChatEvent::Send { text } => {
            let text = text.trim();
            if text.is_empty() {
                return Command::done();
            }
            if !model.chat.input_enabled() {
                log::debug!("chat send ignored while a reply is pending");
                return Command::done();
            }

            model
                .chat
                .transcript
                .push(ChatMessage::user(text, model.clock.as_str()));
            let action = model.chat.begin();

            let request = match HttpCmd::post(build_url("/api/chat"))
                .header("Content-Type", "application/json")
                .body_json(&ChatRequest {
                    message: text.to_string(),
                }) {
                Ok(request) => request,
                Err(e) => {
                    log::error!("Failed to create chat request: {e}");
                    model.chat.finish(action);
                    model
                        .chat
                        .transcript
                        .push(ChatMessage::bot(CHAT_FALLBACK, model.clock.as_str()));
                    return render();
                }
            };

            Command::all([
                render(),
                request.build().then_send(move |result| {
                    Event::Chat(ChatEvent::Reply {
                        action,
                        result: process_json_response("Chat", result),
                    })
                }),
            ])
        }

        ChatEvent::Reply { action, result } => {
            // cleared or superseded while in flight
            if !model.chat.finish(action) {
                log::debug!("dropping stale chat reply {action:?}");
                return Command::done();
            }

            let text = match result {
                Ok(ChatReply { response }) if !response.trim().is_empty() => response,
                Ok(_) => {
                    log::warn!("chat reply without a response");
                    CHAT_FALLBACK.to_string()
                }
                Err(e) => {
                    log::error!("{e}");
                    CHAT_FALLBACK.to_string()
                }
            };
            model
                .chat
                .transcript
                .push(ChatMessage::bot(text, model.clock.as_str()));
            model.chat.request_focus();
            render()
        }

        ChatEvent::Clear => {
            model.chat.reset(model.clock.as_str());
            render()
        }
    }
}
