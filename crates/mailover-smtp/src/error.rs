//! Error types for SMTP delivery.

use std::io;

/// Result type alias for SMTP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// SMTP error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TLS error.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// Server rejected a command.
    #[error("SMTP error {code}: {message}")]
    Smtp {
        /// Reply code (e.g., 550).
        code: u16,
        /// Error message from server.
        message: String,
    },

    /// Protocol error (malformed or unexpected response).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Server advertised no authentication mechanism this client speaks.
    #[error("no supported authentication mechanism (server offers: {0})")]
    NoAuthMechanism(String),
}

impl Error {
    /// Creates an SMTP error from a reply code and message.
    #[must_use]
    pub fn smtp(code: u16, message: impl Into<String>) -> Self {
        Self::Smtp {
            code,
            message: message.into(),
        }
    }
}

impl From<Error> for mailover::Error {
    fn from(err: Error) -> Self {
        Self::transport(err)
    }
}
