//! Error types for subproc

use thiserror::Error;

/// Main error type for subproc
#[derive(Error, Debug)]
pub enum SubprocError {
    #[error("Failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Signal error: {0}")]
    Signal(String),

    #[error("Process is not running")]
    NotRunning,

    #[error("Process is already running")]
    AlreadyRunning,

    #[error("Config error: {0}")]
    Config(String),

    #[error("Restart budget exhausted after {restarts} restarts")]
    RestartBudgetExhausted { restarts: u32 },
}

pub type Result<T> = std::result::Result<T, SubprocError>;
