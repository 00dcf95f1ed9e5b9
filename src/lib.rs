// Keyboard teleop for a mobile robot base, publishing velocity commands over zenoh

pub mod cli;
pub mod config;
pub mod control;
pub mod error;
pub mod input;
pub mod messages;
pub mod runtime;
pub mod sink;
pub mod timer;
