//! Domain-based type organization
//!
//! Types are organized by domain to match the structure in `update/`:
//! - light: Room light state and the light REST/push payloads
//! - chat: Chat transcript and chat endpoint payloads
//! - notification: Single-slot toast
//! - connection: Realtime connection status

pub mod chat;
pub mod connection;
pub mod light;
pub mod notification;

pub use chat::*;
pub use connection::*;
pub use light::*;
pub use notification::*;
