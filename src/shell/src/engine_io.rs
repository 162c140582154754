//! Minimal Engine.IO v4 / Socket.IO v5 text codec.
//!
//! Only what the dashboard needs over a websocket transport: the open
//! handshake, heartbeats and events on the default namespace. Binary
//! attachments and acknowledgements are not supported.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Socket.IO connect request for the default namespace
pub const CONNECT: &str = "40";
/// Engine.IO pong, the answer to a server ping
pub const PONG: &str = "3";

/// Engine.IO v4 server defaults, in milliseconds
const DEFAULT_PING_INTERVAL_MS: u64 = 25_000;
const DEFAULT_PING_TIMEOUT_MS: u64 = 20_000;

fn default_ping_interval() -> u64 {
    DEFAULT_PING_INTERVAL_MS
}

fn default_ping_timeout() -> u64 {
    DEFAULT_PING_TIMEOUT_MS
}

/// Payload of the Engine.IO open packet
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OpenPayload {
    pub sid: String,
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u64,
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout: u64,
}

impl OpenPayload {
    /// Time without a server ping after which the session is considered dead
    pub fn heartbeat_window(&self) -> Duration {
        Duration::from_millis(self.ping_interval.saturating_add(self.ping_timeout))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Packet {
    Open(OpenPayload),
    Close,
    Ping,
    Pong,
    Message(SocketPacket),
    Noop,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SocketPacket {
    Connect,
    Disconnect,
    Event { name: String, args: Vec<Value> },
    ConnectError(String),
    /// Acks and binary packets
    Unsupported(char),
}

pub fn decode(text: &str) -> Result<Packet> {
    let mut chars = text.chars();
    let kind = chars.next().context("empty engine.io packet")?;
    let rest = chars.as_str();

    let packet = match kind {
        '0' => Packet::Open(serde_json::from_str(rest).context("invalid open payload")?),
        '1' => Packet::Close,
        '2' => Packet::Ping,
        '3' => Packet::Pong,
        '4' => Packet::Message(decode_socket(rest)?),
        '6' => Packet::Noop,
        other => bail!("unsupported engine.io packet type '{other}'"),
    };
    Ok(packet)
}

fn decode_socket(text: &str) -> Result<SocketPacket> {
    let mut chars = text.chars();
    let kind = chars.next().context("empty socket.io packet")?;
    let payload = strip_ack_id(strip_namespace(chars.as_str()));

    let packet = match kind {
        '0' => SocketPacket::Connect,
        '1' => SocketPacket::Disconnect,
        '2' => {
            let mut items: Vec<Value> =
                serde_json::from_str(payload).context("invalid socket.io event payload")?;
            if items.is_empty() {
                bail!("socket.io event without name");
            }
            let name = match items.remove(0) {
                Value::String(name) => name,
                other => bail!("socket.io event name is not a string: {other}"),
            };
            SocketPacket::Event { name, args: items }
        }
        '4' => SocketPacket::ConnectError(connect_error_message(payload)),
        other => SocketPacket::Unsupported(other),
    };
    Ok(packet)
}

/// Namespaces other than `/` are prefixed as `/name,`
fn strip_namespace(text: &str) -> &str {
    if text.starts_with('/') {
        match text.find(',') {
            Some(idx) => &text[idx + 1..],
            None => "",
        }
    } else {
        text
    }
}

fn strip_ack_id(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_ascii_digit())
}

fn connect_error_message(payload: &str) -> String {
    serde_json::from_str::<Value>(payload)
        .ok()
        .and_then(|value| value.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| payload.to_string())
}
