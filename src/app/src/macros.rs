/// Macro for model field updates with automatic rendering.
/// Supports both single and multiple field updates.
///
/// # Examples
///
/// Single field update:
/// ```ignore
/// update_field!(model.last_update, Some(time))
/// ```
///
/// Multiple field updates:
/// ```ignore
/// update_field!(
///     model.is_loading, false;
///     model.last_update, None
/// )
/// ```
#[macro_export]
macro_rules! update_field {
    // Multiple field updates (must come first to match the pattern)
    ($($model_field:expr, $value:expr);+ $(;)?) => {{
        let mut changed = false;
        $(
            let value = $value;
            if $model_field != value {
                $model_field = value;
                changed = true;
            }
        )+
        if changed {
            crux_core::render::render()
        } else {
            crux_core::Command::done()
        }
    }};

    // Single field update
    ($model_field:expr, $value:expr) => {{
        update_field!($model_field, $value;)
    }};
}

// Re-export http_helpers functions for macro use
pub use crate::http_helpers::{
    build_url, parse_json_response, process_command_response, process_json_response, BASE_URL,
};

/// Macro for HTTP GET requests expecting a JSON response.
/// Requires domain parameters for event wrapping.
///
/// # Example
/// ```ignore
/// http_get!(Light, LightEvent, build_url("/api/lights/status"), StatusResponse, LightsStatus)
/// ```
#[macro_export]
macro_rules! http_get {
    ($domain:ident, $domain_event:ident, $url:expr, $response_event:ident, $response_type:ty) => {
        $crate::HttpCmd::get($url).build().then_send(|result| {
            let event_result: Result<$response_type, String> =
                $crate::process_json_response(stringify!($response_event), result);
            $crate::events::Event::$domain($crate::events::$domain_event::$response_event(
                event_result,
            ))
        })
    };
}

/// Macro for light command POSTs (no request body).
///
/// The raw result is normalized by `process_command_response` and bound to
/// `result` inside the event expression.
///
/// # Example
/// ```ignore
/// light_post!(format!("/api/light/{room}/on"), "Set light", |result| {
///     Event::Light(LightEvent::SetLightResponse { room, on, result })
/// })
/// ```
#[macro_export]
macro_rules! light_post {
    ($endpoint:expr, $action:expr, |$result:ident| $event:expr) => {
        $crate::HttpCmd::post($crate::build_url(&$endpoint))
            .build()
            .then_send(move |raw| {
                let $result = $crate::process_command_response($action, raw);
                $event
            })
    };
}
