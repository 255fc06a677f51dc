use thiserror::Error;

/// Top-level error type for Prosperez.
#[derive(Debug, Error)]
pub enum BotError {
    /// Error from the messaging channel (send, parse, client build).
    #[error("channel error: {0}")]
    Channel(String),

    /// A session could not be created or has gone away.
    #[error("session error: {0}")]
    Session(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
