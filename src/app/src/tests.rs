use super::*;
use crux_core::{App as _, Command, Request};
use crux_http::protocol::{HttpRequest, HttpResponse, HttpResult as HttpOutput};
use serde_json::json;

fn take_http(cmd: &mut Command<Effect, Event>) -> Request<HttpRequest> {
    cmd.effects()
        .find_map(|effect| match effect {
            Effect::Http(request) => Some(request),
            _ => None,
        })
        .expect("expected an HTTP effect")
}

fn take_timer(cmd: &mut Command<Effect, Event>) -> Request<TimerOperation> {
    cmd.effects()
        .find_map(|effect| match effect {
            Effect::Timer(request) => Some(request),
            _ => None,
        })
        .expect("expected a timer effect")
}

fn single_event(cmd: &mut Command<Effect, Event>) -> Event {
    let mut events: Vec<Event> = cmd.events().collect();
    assert_eq!(events.len(), 1, "expected exactly one event");
    events.remove(0)
}

fn ok_json(value: serde_json::Value) -> HttpOutput {
    HttpOutput::Ok(HttpResponse::ok().json(value).build())
}

fn status_json(status: u16, value: serde_json::Value) -> HttpOutput {
    HttpOutput::Ok(HttpResponse::status(status).json(value).build())
}

fn light_changed(room: &str, state: bool, source: &str) -> Event {
    Event::Realtime(RealtimeEvent::LightChanged(LightChange {
        room: room.to_string(),
        state,
        source: source.to_string(),
    }))
}

/// Run the command's HTTP request to completion and feed the response event back
fn resolve_http(
    app: &App,
    model: &mut Model,
    cmd: &mut Command<Effect, Event>,
    output: HttpOutput,
) -> Command<Effect, Event> {
    let mut request = take_http(cmd);
    request.resolve(output).expect("to resolve http request");
    let event = single_event(cmd);
    app.update(event, model)
}

mod initialize {
    use super::*;

    #[test]
    fn fetches_status_and_opens_push_channel() {
        let app = App;
        let mut model = Model::default();

        let mut cmd = app.update(
            Event::Initialize {
                rooms: vec!["Hall".into(), "kitchen".into()],
            },
            &mut model,
        );

        assert!(model.is_loading);
        assert_eq!(model.rooms.len(), 2);

        let effects: Vec<Effect> = cmd.effects().collect();
        assert!(effects.iter().any(|e| matches!(e, Effect::Render(_))));
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::Http(request) if request.operation.method == "GET"
                && request.operation.url == "https://relative/api/lights/status"
        )));
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::Realtime(request) if request.operation == RealtimeOperation::Connect
        )));
    }

    #[test]
    fn status_response_sets_every_known_room_silently() {
        let app = App;
        let mut model = Model::default();
        let mut cmd = app.update(Event::Light(LightEvent::Refresh), &mut model);

        let mut cmd = resolve_http(
            &app,
            &mut model,
            &mut cmd,
            ok_json(json!({"hall": true, "bedroom": false, "kitchen": true, "garage": true})),
        );

        assert!(!model.is_loading);
        assert!(model.room("hall").unwrap().is_on);
        assert!(model.room("kitchen").unwrap().is_on);
        assert!(!model.room("bedroom").unwrap().is_on);
        assert!(model.room("garage").is_none());
        assert_eq!(
            model.room("hall").unwrap().source,
            Some(LightSource::System)
        );
        assert!(!model.notification.is_visible());
        assert!(cmd.effects().all(|e| matches!(e, Effect::Render(_))));
    }

    #[test]
    fn status_failure_shows_error_toast() {
        let app = App;
        let mut model = Model::default();
        let mut cmd = app.update(Event::Light(LightEvent::Refresh), &mut model);

        let _ = resolve_http(
            &app,
            &mut model,
            &mut cmd,
            HttpOutput::Err(crux_http::HttpError::Io("connection refused".into())),
        );

        assert!(!model.is_loading);
        assert!(model.notification.is_visible());
        assert_eq!(
            model.notification.current().unwrap().severity,
            Severity::Error
        );
        assert!(model.rooms.iter().all(|light| !light.is_on));
    }
}

mod push {
    use super::*;

    #[test]
    fn automation_change_updates_card_and_notifies() {
        let app = App;
        let mut model = Model::default();

        let mut cmd = app.update(light_changed("kitchen", true, "automation"), &mut model);

        let kitchen = model.room("kitchen").unwrap();
        assert!(kitchen.is_on);
        assert_eq!(kitchen.source, Some(LightSource::Automation));

        let notification = model.notification.current().unwrap();
        assert_eq!(notification.message, "Kitchen light turned ON automatically");
        assert_eq!(notification.severity, Severity::Info);

        let timer = take_timer(&mut cmd);
        assert_eq!(
            timer.operation,
            TimerOperation::Start {
                millis: NOTIFICATION_TTL_MS
            }
        );
    }

    #[test]
    fn system_update_turns_every_card_on_silently() {
        let app = App;
        let mut model = Model::default();

        for room in DEFAULT_ROOMS {
            let _ = app.update(light_changed(room, true, "system"), &mut model);
        }

        let view = crux_core::App::view(&app, &model);
        for card in &view.rooms {
            assert_eq!(card.indicator_text, "ON");
            assert_eq!(card.card_class, "light-card active");
        }
        assert_eq!(model.notification.shown(), 0);
    }

    #[test]
    fn user_and_system_changes_are_silent() {
        let app = App;
        let mut model = Model::default();

        let _ = app.update(light_changed("bedroom", true, "web"), &mut model);
        let _ = app.update(light_changed("hall", true, "system"), &mut model);

        assert!(model.room("bedroom").unwrap().is_on);
        assert_eq!(
            model.room("bedroom").unwrap().source,
            Some(LightSource::User)
        );
        assert!(model.room("hall").unwrap().is_on);
        assert_eq!(model.notification.shown(), 0);
    }

    #[test]
    fn unknown_room_is_ignored() {
        let app = App;
        let mut model = Model::default();
        let before = model.clone();

        let mut cmd = app.update(light_changed("garage", true, "automation"), &mut model);

        assert_eq!(model, before);
        assert_eq!(cmd.effects().count(), 0);
    }

    #[test]
    fn all_rooms_push_updates_every_card_once() {
        let app = App;
        let mut model = Model::default();

        let _ = app.update(light_changed("all", true, "chatbot"), &mut model);

        assert_eq!(model.lights_on(), model.rooms.len());
        assert_eq!(model.notification.shown(), 1);
        assert_eq!(
            model.notification.current().unwrap().message,
            "All lights turned ON by the assistant"
        );
    }

    #[test]
    fn last_push_wins() {
        let app = App;
        let mut model = Model::default();

        let _ = app.update(light_changed("hall", true, "button"), &mut model);
        let _ = app.update(light_changed("hall", false, "automation"), &mut model);

        let hall = model.room("hall").unwrap();
        assert!(!hall.is_on);
        assert_eq!(hall.source, Some(LightSource::Automation));
    }
}

mod commands {
    use super::*;

    #[test]
    fn set_light_posts_without_touching_state() {
        let app = App;
        let mut model = Model::default();
        let before = model.clone();

        let mut cmd = app.update(
            Event::Light(LightEvent::SetLight {
                room: "Kitchen".into(),
                on: true,
            }),
            &mut model,
        );

        assert_eq!(model, before);
        let request = take_http(&mut cmd);
        assert_eq!(request.operation.method, "POST");
        assert_eq!(
            request.operation.url,
            "https://relative/api/light/kitchen/on"
        );
    }

    #[test]
    fn set_light_success_shows_nothing() {
        let app = App;
        let mut model = Model::default();
        let mut cmd = app.update(
            Event::Light(LightEvent::SetLight {
                room: "hall".into(),
                on: false,
            }),
            &mut model,
        );

        let _ = resolve_http(
            &app,
            &mut model,
            &mut cmd,
            ok_json(json!({"status": "success", "room": "hall", "state": false})),
        );

        assert_eq!(model.notification.shown(), 0);
        assert!(!model.room("hall").unwrap().is_on);
    }

    #[test]
    fn error_field_is_shown_whatever_the_status() {
        let app = App;
        let mut model = Model::default();
        let mut cmd = app.update(
            Event::Light(LightEvent::SetLight {
                room: "attic".into(),
                on: true,
            }),
            &mut model,
        );

        let _ = resolve_http(
            &app,
            &mut model,
            &mut cmd,
            status_json(404, json!({"error": "Room not found"})),
        );

        let notification = model.notification.current().unwrap();
        assert_eq!(notification.message, "Room not found");
        assert_eq!(notification.severity, Severity::Error);
    }

    #[test]
    fn all_lights_success_is_confirmed() {
        let app = App;
        let mut model = Model::default();
        let mut cmd = app.update(
            Event::Light(LightEvent::SetAllLights { on: false }),
            &mut model,
        );

        assert_eq!(
            take_http(&mut cmd).operation.url,
            "https://relative/api/light/all/off"
        );

        let mut cmd = app.update(
            Event::Light(LightEvent::SetAllLightsResponse {
                on: false,
                result: Ok(LightCommandResponse::default()),
            }),
            &mut model,
        );

        let notification = model.notification.current().unwrap();
        assert_eq!(notification.message, "All lights turned OFF");
        assert_eq!(notification.severity, Severity::Success);
        let _ = take_timer(&mut cmd);
    }

    #[test]
    fn all_lights_application_error_is_shown_once() {
        let app = App;
        let mut model = Model::default();
        let mut cmd = app.update(
            Event::Light(LightEvent::SetAllLights { on: true }),
            &mut model,
        );

        let _ = resolve_http(
            &app,
            &mut model,
            &mut cmd,
            ok_json(json!({"error": "device offline"})),
        );

        assert_eq!(model.notification.shown(), 1);
        let notification = model.notification.current().unwrap();
        assert!(notification.message.contains("device offline"));
        assert_eq!(notification.severity, Severity::Error);
    }

    #[test]
    fn all_lights_network_failure_shows_generic_error_once() {
        let app = App;
        let mut model = Model::default();
        let mut cmd = app.update(
            Event::Light(LightEvent::SetAllLights { on: true }),
            &mut model,
        );

        let _ = resolve_http(
            &app,
            &mut model,
            &mut cmd,
            HttpOutput::Err(crux_http::HttpError::Io("connection reset".into())),
        );

        assert_eq!(model.notification.shown(), 1);
        assert_eq!(
            model.notification.current().unwrap().message,
            update::GENERIC_ERROR
        );
    }

    #[test]
    fn server_error_without_message_shows_generic_error() {
        let app = App;
        let mut model = Model::default();
        let mut cmd = app.update(
            Event::Light(LightEvent::SetAllLights { on: true }),
            &mut model,
        );

        let _ = resolve_http(&app, &mut model, &mut cmd, status_json(500, json!({})));

        let notification = model.notification.current().unwrap();
        assert_eq!(notification.message, update::GENERIC_ERROR);
        assert_eq!(notification.severity, Severity::Error);
        assert_eq!(model.lights_on(), 0);
    }

    #[test]
    fn all_lights_empty_body_shows_generic_error() {
        let app = App;
        let mut model = Model::default();
        let mut cmd = app.update(
            Event::Light(LightEvent::SetAllLights { on: true }),
            &mut model,
        );

        let _ = resolve_http(
            &app,
            &mut model,
            &mut cmd,
            HttpOutput::Ok(HttpResponse::ok().build()),
        );

        assert_eq!(model.notification.shown(), 1);
        let notification = model.notification.current().unwrap();
        assert_eq!(notification.message, update::GENERIC_ERROR);
        assert_eq!(notification.severity, Severity::Error);
    }

    #[test]
    fn set_light_for_all_rooms_is_confirmed() {
        let app = App;
        let mut model = Model::default();
        let mut cmd = app.update(
            Event::Light(LightEvent::SetLight {
                room: " All ".into(),
                on: true,
            }),
            &mut model,
        );

        let mut request = take_http(&mut cmd);
        assert_eq!(
            request.operation.url,
            "https://relative/api/light/all/on"
        );
        request
            .resolve(ok_json(json!({"status": "success"})))
            .expect("to resolve http request");
        let event = single_event(&mut cmd);
        assert!(matches!(
            event,
            Event::Light(LightEvent::SetAllLightsResponse { on: true, .. })
        ));
        let _ = app.update(event, &mut model);

        let notification = model.notification.current().unwrap();
        assert_eq!(notification.message, "All lights turned ON");
        assert_eq!(notification.severity, Severity::Success);
    }
}

mod chat {
    use super::*;

    fn send(app: &App, model: &mut Model, text: &str) -> Command<Effect, Event> {
        app.update(
            Event::Chat(ChatEvent::Send {
                text: text.to_string(),
            }),
            model,
        )
    }

    #[test]
    fn send_appends_user_message_and_posts() {
        let app = App;
        let mut model = Model::default();
        let _ = app.update(Event::Ui(UiEvent::Tick { time: "10:15".into() }), &mut model);

        let mut cmd = send(&app, &mut model, "  turn on the kitchen  ");

        let last = model.chat.transcript.last().unwrap();
        assert_eq!(last.sender, Sender::User);
        assert_eq!(last.text, "turn on the kitchen");
        assert_eq!(last.timestamp, "10:15");
        assert!(!model.chat.input_enabled());

        let request = take_http(&mut cmd);
        assert_eq!(request.operation.url, "https://relative/api/chat");
        let body: serde_json::Value = serde_json::from_slice(&request.operation.body).unwrap();
        assert_eq!(body, json!({"message": "turn on the kitchen"}));
    }

    #[test]
    fn reply_appends_bot_message_and_refocuses() {
        let app = App;
        let mut model = Model::default();
        let focus = model.chat.focus_generation();
        let mut cmd = send(&app, &mut model, "hello");

        let _ = resolve_http(
            &app,
            &mut model,
            &mut cmd,
            ok_json(json!({"response": "Hi there!"})),
        );

        let last = model.chat.transcript.last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.text, "Hi there!");
        assert!(model.chat.input_enabled());
        assert!(model.chat.focus_generation() > focus);
    }

    #[test]
    fn failed_request_appends_fallback() {
        let app = App;
        let mut model = Model::default();
        let mut cmd = send(&app, &mut model, "hello");

        let _ = resolve_http(&app, &mut model, &mut cmd, status_json(500, json!({})));

        assert_eq!(model.chat.transcript.last().unwrap().text, CHAT_FALLBACK);
        assert!(model.chat.input_enabled());
    }

    #[test]
    fn reply_without_response_appends_fallback() {
        let app = App;
        let mut model = Model::default();
        let mut cmd = send(&app, &mut model, "hello");

        let _ = resolve_http(&app, &mut model, &mut cmd, ok_json(json!({"response": "  "})));

        let last = model.chat.transcript.last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.text, CHAT_FALLBACK);
        assert!(model.chat.input_enabled());
    }

    #[test]
    fn blank_input_is_ignored() {
        let app = App;
        let mut model = Model::default();

        let mut cmd = send(&app, &mut model, "   ");

        assert_eq!(model.chat.transcript.len(), 1);
        assert_eq!(cmd.effects().count(), 0);
    }

    #[test]
    fn send_while_pending_is_ignored() {
        let app = App;
        let mut model = Model::default();
        let _ = send(&app, &mut model, "first");

        let mut cmd = send(&app, &mut model, "second");

        assert_eq!(model.chat.transcript.len(), 2);
        assert_eq!(cmd.effects().count(), 0);
    }

    #[test]
    fn clear_drops_reply_in_flight() {
        let app = App;
        let mut model = Model::default();
        let mut cmd = send(&app, &mut model, "hello");

        let _ = app.update(Event::Chat(ChatEvent::Clear), &mut model);
        assert_eq!(model.chat.transcript.len(), 1);
        assert_eq!(model.chat.transcript[0].text, GREETING);
        assert!(model.chat.input_enabled());

        let _ = resolve_http(
            &app,
            &mut model,
            &mut cmd,
            ok_json(json!({"response": "late"})),
        );

        assert_eq!(model.chat.transcript.len(), 1);
    }

    #[test]
    fn enter_in_chat_input_sends() {
        let app = App;
        let mut model = Model::default();

        let _ = app.update(
            Event::Ui(UiEvent::KeyPressed {
                key: "Enter".into(),
                ctrl: false,
                chat_input: Some("lights?".into()),
            }),
            &mut model,
        );

        assert_eq!(model.chat.transcript.last().unwrap().text, "lights?");
    }
}

mod ui {
    use super::*;

    #[test]
    fn ctrl_slash_focuses_chat() {
        let app = App;
        let mut model = Model::default();

        let _ = app.update(
            Event::Ui(UiEvent::KeyPressed {
                key: "/".into(),
                ctrl: true,
                chat_input: None,
            }),
            &mut model,
        );
        assert_eq!(model.chat.focus_generation(), 1);

        let _ = app.update(
            Event::Ui(UiEvent::KeyPressed {
                key: "/".into(),
                ctrl: false,
                chat_input: None,
            }),
            &mut model,
        );
        assert_eq!(model.chat.focus_generation(), 1);
    }

    #[test]
    fn toast_hides_after_timer() {
        let app = App;
        let mut model = Model::default();
        let mut cmd = app.update(light_changed("hall", true, "automation"), &mut model);

        let mut timer = take_timer(&mut cmd);
        timer
            .resolve(TimerOutput::Elapsed)
            .expect("to resolve timer");
        let event = single_event(&mut cmd);
        assert_eq!(event, Event::Ui(UiEvent::HideNotification));

        let _ = app.update(event, &mut model);
        assert!(!model.notification.is_visible());
        assert_eq!(
            model.notification.current().unwrap().message,
            "Hall light turned ON automatically"
        );
    }

    #[test]
    fn newer_toast_replaces_older() {
        let app = App;
        let mut model = Model::default();

        let mut first = app.update(light_changed("hall", true, "automation"), &mut model);
        let _ = app.update(light_changed("kitchen", true, "chatbot"), &mut model);

        assert_eq!(model.notification.shown(), 2);
        assert_eq!(
            model.notification.current().unwrap().message,
            "Kitchen light turned ON by the assistant"
        );

        // the earlier hide timer is not cancelled
        let mut timer = take_timer(&mut first);
        timer
            .resolve(TimerOutput::Elapsed)
            .expect("to resolve timer");
        let event = single_event(&mut first);
        let _ = app.update(event, &mut model);

        assert!(!model.notification.is_visible());
        assert_eq!(
            model.notification.current().unwrap().message,
            "Kitchen light turned ON by the assistant"
        );
    }

    #[test]
    fn tick_sets_clock_and_last_update() {
        let app = App;
        let mut model = Model::default();

        let _ = app.update(Event::Ui(UiEvent::Tick { time: "09:30".into() }), &mut model);

        assert_eq!(model.clock, "09:30");
        assert_eq!(model.last_update.as_deref(), Some("09:30"));
    }
}

mod realtime {
    use super::*;

    #[test]
    fn lifecycle_signals_drive_status() {
        let app = App;
        let mut model = Model::default();

        let _ = app.update(Event::Realtime(RealtimeEvent::Connected), &mut model);
        assert!(model.connection.is_connected());
        assert_eq!(model.connection.label, "Connected");

        let _ = app.update(Event::Realtime(RealtimeEvent::Disconnected), &mut model);
        assert!(!model.connection.is_connected());
        assert_eq!(model.connection.label, "Disconnected");

        let _ = app.update(Event::Realtime(RealtimeEvent::Reconnected), &mut model);
        assert!(model.connection.is_connected());
        assert_eq!(model.connection.label, "Reconnected");
    }

    #[test]
    fn shell_error_marks_channel_disconnected() {
        let app = App;
        let mut model = Model::default();
        let _ = app.update(Event::Realtime(RealtimeEvent::Connected), &mut model);

        let _ = app.update(
            Event::Realtime(RealtimeEvent::OperationResult(RealtimeOutput::Error {
                message: "unreachable".into(),
            })),
            &mut model,
        );

        assert!(!model.connection.is_connected());
    }
}
