//! HTTP helper functions for Crux Core
//!
//! This module extracts common HTTP response handling logic from the update
//! handlers into debuggable, testable functions.

use crux_http::Response;

use crate::types::LightCommandResponse;

/// Base URL for backend API endpoints.
///
/// NOTE: This is a dummy prefix required because `crux_http` requires
/// absolute URLs and rejects relative paths (`RelativeUrlWithoutBase` error).
/// Shells replace this prefix with the dashboard's origin (browser) or the
/// configured backend URL (native shell) before sending requests.
pub const BASE_URL: &str = "https://relative";

/// Constructs the full address from a given endpoint.
///
/// # Example
/// ```
/// use smarthome_ui_core::http_helpers::build_url;
/// let url = build_url("/api/lights/status");
/// assert_eq!(url, "https://relative/api/lights/status");
/// ```
pub fn build_url(endpoint: &str) -> String {
    format!("{BASE_URL}{endpoint}")
}

/// Returns `true` if the response status is 2xx.
pub fn is_response_success(response: &Response<Vec<u8>>) -> bool {
    response.status().is_success()
}

/// Extracts error message from HTTP response.
pub fn extract_error_message(action: &str, response: &mut Response<Vec<u8>>) -> String {
    let status = response.status().to_string();

    match response.take_body() {
        Some(body) => {
            if body.is_empty() {
                format!("{action} failed: HTTP {status} (Empty body)")
            } else {
                match String::from_utf8(body) {
                    Ok(msg) => format!("{action} failed: HTTP {status} ({msg})"),
                    Err(e) => format!("{action} failed: HTTP {status} (Invalid UTF-8: {e})"),
                }
            }
        }
        None => format!("{action} failed: HTTP {status} (No body)"),
    }
}

/// Parse JSON from response body.
///
/// Returns error if response is not successful or JSON parsing fails.
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    action: &str,
    response: &mut Response<Vec<u8>>,
) -> Result<T, String> {
    if !is_response_success(response) {
        return Err(extract_error_message(action, response));
    }

    match response.take_body() {
        Some(body) => {
            serde_json::from_slice(&body).map_err(|e| format!("{action}: JSON parse error: {e}"))
        }
        None => Err(format!("{action}: Empty response body")),
    }
}

/// Process HTTP response result and parse JSON
pub fn process_json_response<T: serde::de::DeserializeOwned>(
    action: &str,
    result: crux_http::Result<Response<Vec<u8>>>,
) -> Result<T, String> {
    match result {
        Ok(mut response) => parse_json_response(action, &mut response),
        Err(e) => Err(format!("{action}: {e}")),
    }
}

/// Process the response of a light command.
///
/// An `error` field in the body is an application error and is returned as
/// `Ok` whatever the status code (the backend answers unknown rooms with
/// `404 {"error": "Room not found"}`). Transport failures, bodies that are
/// not JSON (an empty body included) and non-2xx answers without an `error`
/// field are `Err`.
pub fn process_command_response(
    action: &str,
    result: crux_http::Result<Response<Vec<u8>>>,
) -> Result<LightCommandResponse, String> {
    let mut response = result.map_err(|e| format!("{action}: {e}"))?;
    let success = is_response_success(&response);
    let status = response.status().to_string();
    let body = response.take_body().unwrap_or_default();

    match serde_json::from_slice::<LightCommandResponse>(&body) {
        Ok(parsed) if parsed.error.is_some() || success => Ok(parsed),
        Ok(_) => Err(format!("{action} failed: HTTP {status}")),
        Err(e) => Err(format!("{action}: JSON parse error: {e}")),
    }
}

// Note: these helpers are exercised through the update handlers in
// `tests.rs`, which resolve real `crux_http` requests; `crux_http::Response`
// cannot be constructed directly.
