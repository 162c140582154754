pub mod realtime;
pub mod timer;
