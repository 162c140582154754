//! Socket.IO push channel client.
//!
//! A background task owns the websocket. It performs the Engine.IO handshake,
//! answers heartbeats, forwards `light_changed` events and reconnects with
//! exponential backoff until it is stopped.

use crate::config::RealtimeConfig;
use crate::engine_io::{self, OpenPayload, Packet, SocketPacket};
use anyhow::{Context, Result, bail};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use smarthome_ui_core::{Event, LightChange, RealtimeEvent};
use std::time::Duration;
use tokio::{
    net::TcpStream,
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::{Instant, sleep, timeout},
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message as WsMessage,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);
const LIGHT_CHANGED: &str = "light_changed";

/// What the client reports to the shell
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RealtimeSignal {
    Connected,
    Reconnected,
    Disconnected,
    LightChanged(LightChange),
}

impl From<RealtimeSignal> for Event {
    fn from(signal: RealtimeSignal) -> Self {
        let event = match signal {
            RealtimeSignal::Connected => RealtimeEvent::Connected,
            RealtimeSignal::Reconnected => RealtimeEvent::Reconnected,
            RealtimeSignal::Disconnected => RealtimeEvent::Disconnected,
            RealtimeSignal::LightChanged(change) => RealtimeEvent::LightChanged(change),
        };
        Event::Realtime(event)
    }
}

/// Handle to the running client task
pub struct RealtimeHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl RealtimeHandle {
    pub fn spawn(config: RealtimeConfig, signals: mpsc::Sender<RealtimeSignal>) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run_client_task(config, signals, shutdown_rx));
        Self {
            shutdown_tx: Some(shutdown_tx),
            task,
        }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Ask the task to close the socket and exit
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            // the task may already be gone
            let _ = tx.send(());
        }
    }
}

impl Drop for RealtimeHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

enum LoopExit {
    Shutdown,
    Lost(String),
}

async fn run_client_task(
    config: RealtimeConfig,
    signals: mpsc::Sender<RealtimeSignal>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut attempt: u32 = 0;
    let mut has_connected = false;

    loop {
        let session = tokio::select! {
            _ = &mut shutdown => break,
            session = open_session(&config.url) => session,
        };

        match session {
            Ok((ws, open)) => {
                attempt = 0;
                let signal = if has_connected {
                    log::info!("realtime: reconnected (sid {})", open.sid);
                    RealtimeSignal::Reconnected
                } else {
                    log::info!("realtime: connected (sid {})", open.sid);
                    RealtimeSignal::Connected
                };
                has_connected = true;
                if signals.send(signal).await.is_err() {
                    break;
                }

                match run_io_loop(ws, &open, &signals, &mut shutdown).await {
                    LoopExit::Shutdown => break,
                    LoopExit::Lost(reason) => {
                        log::warn!("realtime: connection lost: {reason}");
                        if signals.send(RealtimeSignal::Disconnected).await.is_err() {
                            break;
                        }
                    }
                }
            }
            Err(e) => log::warn!("realtime: connection attempt failed: {e:#}"),
        }

        attempt = attempt.saturating_add(1);
        let backoff = compute_backoff(attempt, config.initial_backoff, config.max_backoff);
        log::debug!("realtime: retrying in {backoff:?} (attempt {attempt})");

        tokio::select! {
            _ = &mut shutdown => break,
            _ = sleep(backoff) => {}
        }
    }

    log::debug!("realtime: client task exiting");
}

/// Connect and complete the Engine.IO and Socket.IO handshakes
async fn open_session(url: &str) -> Result<(WsStream, OpenPayload)> {
    timeout(HANDSHAKE_TIMEOUT, handshake(url))
        .await
        .context("handshake timed out")?
}

async fn handshake(url: &str) -> Result<(WsStream, OpenPayload)> {
    let (mut ws, _response) = connect_async(url)
        .await
        .with_context(|| format!("failed to connect to {url}"))?;

    let open = match engine_io::decode(&next_text(&mut ws).await?)? {
        Packet::Open(open) => open,
        other => bail!("expected engine.io open packet, got {other:?}"),
    };

    ws.send(WsMessage::Text(engine_io::CONNECT.into()))
        .await
        .context("failed to send socket.io connect")?;

    loop {
        match engine_io::decode(&next_text(&mut ws).await?)? {
            Packet::Message(SocketPacket::Connect) => return Ok((ws, open)),
            Packet::Message(SocketPacket::ConnectError(message)) => {
                bail!("server refused connection: {message}")
            }
            Packet::Ping => ws
                .send(WsMessage::Text(engine_io::PONG.into()))
                .await
                .context("failed to send pong")?,
            other => log::debug!("realtime: ignoring {other:?} during handshake"),
        }
    }
}

async fn next_text(ws: &mut WsStream) -> Result<String> {
    loop {
        match ws.next().await {
            Some(Ok(WsMessage::Text(text))) => return Ok(text.as_str().to_string()),
            Some(Ok(WsMessage::Close(_))) | None => bail!("socket closed during handshake"),
            Some(Ok(_)) => {}
            Some(Err(e)) => return Err(e).context("websocket read error"),
        }
    }
}

/// Run one session's read loop.
async fn run_io_loop(
    ws: WsStream,
    open: &OpenPayload,
    signals: &mpsc::Sender<RealtimeSignal>,
    shutdown: &mut oneshot::Receiver<()>,
) -> LoopExit {
    let (mut ws_sink, mut ws_stream) = ws.split();
    let window = open.heartbeat_window();
    let heartbeat = sleep(window);
    tokio::pin!(heartbeat);

    loop {
        tokio::select! {
            frame = ws_stream.next() => {
                let text = match frame {
                    Some(Ok(WsMessage::Text(text))) => text,
                    Some(Ok(WsMessage::Close(_))) | None => {
                        return LoopExit::Lost("socket closed".to_string());
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return LoopExit::Lost(format!("read error: {e}")),
                };

                match engine_io::decode(text.as_str()) {
                    Ok(Packet::Ping) => {
                        heartbeat.as_mut().reset(Instant::now() + window);
                        if let Err(e) = ws_sink.send(WsMessage::Text(engine_io::PONG.into())).await {
                            return LoopExit::Lost(format!("failed to send pong: {e}"));
                        }
                    }
                    Ok(Packet::Close) | Ok(Packet::Message(SocketPacket::Disconnect)) => {
                        return LoopExit::Lost("server closed the session".to_string());
                    }
                    Ok(Packet::Message(SocketPacket::Event { name, args })) => {
                        if let Some(change) = light_change(&name, args) {
                            if signals.send(RealtimeSignal::LightChanged(change)).await.is_err() {
                                return LoopExit::Shutdown;
                            }
                        }
                    }
                    Ok(other) => log::trace!("realtime: ignoring {other:?}"),
                    Err(e) => log::warn!("realtime: dropping malformed packet: {e:#}"),
                }
            }

            _ = &mut heartbeat => {
                return LoopExit::Lost(format!("no ping within {window:?}"));
            }

            _ = &mut *shutdown => {
                // best effort, the server also notices the closed socket
                let _ = ws_sink.send(WsMessage::Close(None)).await;
                return LoopExit::Shutdown;
            }
        }
    }
}

/// Extract a `light_changed` payload; other events are ignored
fn light_change(name: &str, mut args: Vec<Value>) -> Option<LightChange> {
    if name != LIGHT_CHANGED {
        log::debug!("realtime: ignoring event '{name}'");
        return None;
    }
    if args.is_empty() {
        log::warn!("realtime: {LIGHT_CHANGED} without payload");
        return None;
    }
    match serde_json::from_value(args.swap_remove(0)) {
        Ok(change) => Some(change),
        Err(e) => {
            log::warn!("realtime: malformed {LIGHT_CHANGED} payload: {e}");
            None
        }
    }
}

/// Exponential backoff for reconnection attempt `n` (1-based).
///
/// `initial * 2^(n-1)`, capped at `max`.
fn compute_backoff(attempt: u32, initial: Duration, max: Duration) -> Duration {
    let exponent = attempt.saturating_sub(1);
    let multiplier: u32 = 1u32.checked_shl(exponent).unwrap_or(u32::MAX);
    initial.saturating_mul(multiplier).min(max)
}
