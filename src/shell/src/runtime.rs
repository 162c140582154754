//! Effect loop driving the Crux core.
//!
//! Everything touching the core runs on one task: effects that take time are
//! spawned and report back through the completion channel, where the pending
//! request is looked up and resolved.

use crate::config::AppConfig;
use crate::http_client::HttpTransport;
use crate::input::{self, HELP, InputAction};
use crate::realtime::{RealtimeHandle, RealtimeSignal};
use crate::render::Renderer;
use anyhow::{Context, Result};
use crux_core::{Core, Request};
use crux_http::protocol::{HttpRequest, HttpResult};
use smarthome_ui_core::{
    App, Effect, Event, RealtimeOperation, RealtimeOutput, TimerOperation, TimerOutput, UiEvent,
    ViewModel,
};
use std::{collections::HashMap, io::Write, sync::Arc, time::Duration};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
    time::{MissedTickBehavior, interval, sleep},
};

/// Clock refresh period
const TICK_INTERVAL: Duration = Duration::from_secs(30);
const SIGNAL_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug)]
pub enum Completion {
    Http { id: u64, result: HttpResult },
    Timer { id: u64 },
}

/// Receiving ends of the channels feeding the shell loop
pub struct Inbox {
    pub completions: mpsc::UnboundedReceiver<Completion>,
    pub signals: mpsc::Receiver<RealtimeSignal>,
}

pub struct Shell<T: HttpTransport + 'static> {
    core: Core<App>,
    config: AppConfig,
    transport: Arc<T>,
    renderer: Renderer,
    out: Box<dyn Write + Send>,
    next_id: u64,
    pending_http: HashMap<u64, Request<HttpRequest>>,
    pending_timers: HashMap<u64, Request<TimerOperation>>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    signals_tx: mpsc::Sender<RealtimeSignal>,
    realtime: Option<RealtimeHandle>,
}

impl<T: HttpTransport + 'static> Shell<T> {
    pub fn new(transport: T, config: AppConfig, out: Box<dyn Write + Send>) -> (Self, Inbox) {
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let (signals_tx, signals) = mpsc::channel(SIGNAL_CHANNEL_CAPACITY);

        let shell = Self {
            core: Core::new(),
            config,
            transport: Arc::new(transport),
            renderer: Renderer::default(),
            out,
            next_id: 0,
            pending_http: HashMap::new(),
            pending_timers: HashMap::new(),
            completions_tx,
            signals_tx,
            realtime: None,
        };

        (shell, Inbox { completions, signals })
    }

    /// Run until `/quit`, end of input or Ctrl+C
    pub async fn run(mut self, mut inbox: Inbox) -> Result<()> {
        self.dispatch(tick_event())?;
        self.dispatch(Event::Initialize {
            rooms: self.config.rooms.clone(),
        })?;
        self.print(&format!("{HELP}\n"))?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        let mut clock = interval(TICK_INTERVAL);
        clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
        clock.tick().await; // consume the immediate first tick

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line.context("failed to read stdin")? {
                        Some(line) => {
                            if !self.handle_line(&line)? {
                                break;
                            }
                        }
                        None => {
                            log::debug!("stdin closed");
                            break;
                        }
                    }
                }

                Some(completion) = inbox.completions.recv() => self.complete(completion)?,

                Some(signal) = inbox.signals.recv() => self.dispatch(signal.into())?,

                _ = clock.tick() => self.dispatch(tick_event())?,

                _ = &mut ctrl_c => {
                    log::info!("interrupted");
                    break;
                }
            }
        }

        self.stop_realtime();
        Ok(())
    }

    /// Handle one line of input. Returns `false` when the user quits.
    pub fn handle_line(&mut self, line: &str) -> Result<bool> {
        match input::parse(line) {
            None => {}
            Some(InputAction::Dispatch(event)) => self.dispatch(event)?,
            Some(InputAction::Help) => self.print(&format!("{HELP}\n"))?,
            Some(InputAction::Invalid(message)) => self.print(&format!("{message}\n"))?,
            Some(InputAction::Quit) => return Ok(false),
        }
        Ok(true)
    }

    pub fn dispatch(&mut self, event: Event) -> Result<()> {
        log::trace!("event: {event:?}");
        let effects = self.core.process_event(event);
        self.process_effects(effects)
    }

    /// Resolve the request a finished task belongs to
    pub fn complete(&mut self, completion: Completion) -> Result<()> {
        let effects = match completion {
            Completion::Http { id, result } => {
                let Some(mut request) = self.pending_http.remove(&id) else {
                    log::warn!("completion for unknown http request {id}");
                    return Ok(());
                };
                self.core
                    .resolve(&mut request, result)
                    .context("failed to resolve http request")?
            }
            Completion::Timer { id } => {
                let Some(mut request) = self.pending_timers.remove(&id) else {
                    log::warn!("completion for unknown timer {id}");
                    return Ok(());
                };
                self.core
                    .resolve(&mut request, TimerOutput::Elapsed)
                    .context("failed to resolve timer")?
            }
        };
        self.process_effects(effects)
    }

    pub fn view(&self) -> ViewModel {
        self.core.view()
    }

    fn process_effects(&mut self, effects: Vec<Effect>) -> Result<()> {
        for effect in effects {
            match effect {
                Effect::Render(_) => {
                    if let Some(text) = self.renderer.render(&self.core.view()) {
                        self.print(&text)?;
                    }
                }

                Effect::Http(request) => {
                    let id = self.next_id();
                    let operation = request.operation.clone();
                    self.pending_http.insert(id, request);

                    let transport = Arc::clone(&self.transport);
                    let tx = self.completions_tx.clone();
                    tokio::spawn(async move {
                        let result = transport.send(operation).await;
                        // receiver gone means the shell is shutting down
                        let _ = tx.send(Completion::Http { id, result });
                    });
                }

                Effect::Timer(request) => {
                    let id = self.next_id();
                    let TimerOperation::Start { millis } = request.operation;
                    self.pending_timers.insert(id, request);

                    let tx = self.completions_tx.clone();
                    tokio::spawn(async move {
                        sleep(Duration::from_millis(millis)).await;
                        let _ = tx.send(Completion::Timer { id });
                    });
                }

                Effect::Realtime(mut request) => {
                    let output = match request.operation {
                        RealtimeOperation::Connect => self.start_realtime(),
                        RealtimeOperation::Disconnect => {
                            self.stop_realtime();
                            RealtimeOutput::Stopped
                        }
                    };
                    let effects = self
                        .core
                        .resolve(&mut request, output)
                        .context("failed to resolve realtime request")?;
                    self.process_effects(effects)?;
                }
            }
        }
        Ok(())
    }

    fn start_realtime(&mut self) -> RealtimeOutput {
        if self.realtime.as_ref().is_some_and(RealtimeHandle::is_running) {
            log::debug!("realtime client already running");
            return RealtimeOutput::Started;
        }
        log::info!("connecting to {}", self.config.realtime.url);
        self.realtime = Some(RealtimeHandle::spawn(
            self.config.realtime.clone(),
            self.signals_tx.clone(),
        ));
        RealtimeOutput::Started
    }

    fn stop_realtime(&mut self) {
        if let Some(mut handle) = self.realtime.take() {
            handle.stop();
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn print(&mut self, text: &str) -> Result<()> {
        self.out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
            .context("failed to write to terminal")
    }
}

fn tick_event() -> Event {
    Event::Ui(UiEvent::Tick {
        time: chrono::Local::now().format("%H:%M").to_string(),
    })
}
