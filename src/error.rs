// Error types for the teleop binary and library

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TeleopError {
    /// Keyboard poll/read failures and terminal mode changes
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Control task failed: {0}")]
    ControlTask(String),
}

impl TeleopError {
    /// Wrap a zenoh error; zenoh errors are boxed trait objects
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TeleopError>;
