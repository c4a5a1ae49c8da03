//! Server error types.

use thiserror::Error;

/// Errors that can occur in the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error (invalid bind address, missing TLS certs,
    /// etc.).
    ///
    /// Fatal: prevents server startup. Fix configuration and restart.
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport/network error (connection failure, I/O error, etc.).
    ///
    /// May be transient (network issues) or fatal (bind address in use).
    /// Check the message for details.
    #[error("transport error: {0}")]
    Transport(String),

    /// Protocol error (invalid frame format, unsupported version, etc.).
    ///
    /// A client sent malformed data. Fatal for that stream only; the
    /// server keeps serving other clients.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Internal error (unexpected state, exhausted randomness source).
    ///
    /// Should never happen in a correct deployment.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
