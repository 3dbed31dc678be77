//! Error types for MIME generation.

/// Result type alias for MIME generation.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME generation error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Email failed structural validation before encoding began.
    #[error(transparent)]
    Invalid(#[from] mailover::Error),

    /// Message-ID generation failed (entropy source unavailable).
    #[error("can't generate message ID: {0}")]
    MessageId(String),

    /// MIME assembly failure.
    #[error("MIME assembly failed: {0}")]
    Assembly(#[from] std::fmt::Error),
}

impl From<Error> for mailover::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Invalid(inner) => inner,
            Error::MessageId(msg) => Self::MessageId(msg),
            Error::Assembly(fmt_err) => Self::Encoding(fmt_err.to_string()),
        }
    }
}
