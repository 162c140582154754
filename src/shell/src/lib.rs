pub mod config;
pub mod engine_io;
pub mod http_client;
pub mod input;
pub mod realtime;
pub mod render;
pub mod runtime;
