//! Realtime channel command definitions.
//!
//! These types define the interface between the Core and the Shell for the
//! push channel. The Shell owns the socket: it answers `Connect`/`Disconnect`
//! once and afterwards delivers lifecycle signals and `light_changed`
//! payloads as `RealtimeEvent`s directly.

use crux_core::{capability::Operation, command, Command};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

// Operations that the Shell needs to perform on the realtime channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RealtimeOperation {
    Connect,
    Disconnect,
}

// The output from realtime operations (shell tells us what happened)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RealtimeOutput {
    /// The shell started (or already runs) its socket client
    Started,
    /// The shell stopped its socket client
    Stopped,
    Error { message: String },
}

impl Operation for RealtimeOperation {
    type Output = RealtimeOutput;
}

/// Command-based realtime API
pub struct Realtime<Effect, Event> {
    _effect: PhantomData<Effect>,
    _event: PhantomData<Event>,
}

impl<Effect, Event> Realtime<Effect, Event>
where
    Effect: Send + From<crux_core::Request<RealtimeOperation>> + 'static,
    Event: Send + 'static,
{
    /// Start the shell's socket client
    pub fn connect() -> RequestBuilder<Effect, Event> {
        RequestBuilder::new(RealtimeOperation::Connect)
    }

    /// Stop the shell's socket client
    pub fn disconnect() -> RequestBuilder<Effect, Event> {
        RequestBuilder::new(RealtimeOperation::Disconnect)
    }
}

/// Request builder for realtime operations
#[must_use]
pub struct RequestBuilder<Effect, Event> {
    operation: RealtimeOperation,
    _effect: PhantomData<Effect>,
    _event: PhantomData<fn() -> Event>,
}

impl<Effect, Event> RequestBuilder<Effect, Event>
where
    Effect: Send + From<crux_core::Request<RealtimeOperation>> + 'static,
    Event: Send + 'static,
{
    fn new(operation: RealtimeOperation) -> Self {
        Self {
            operation,
            _effect: PhantomData,
            _event: PhantomData,
        }
    }

    /// Build the request into a Command RequestBuilder
    pub fn build(
        self,
    ) -> command::RequestBuilder<Effect, Event, impl std::future::Future<Output = RealtimeOutput>>
    {
        command::RequestBuilder::new(move |ctx| async move {
            Command::request_from_shell(self.operation)
                .into_future(ctx)
                .await
        })
    }
}
