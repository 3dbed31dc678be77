//! Error types for the send pipeline.

use std::fmt;

/// Result type alias for send operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Send pipeline error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Email has neither a text nor an HTML body.
    #[error("email must have either a text or HTML body")]
    MissingBody,

    /// Message-ID generation failed.
    #[error("can't generate message ID: {0}")]
    MessageId(String),

    /// MIME assembly failure.
    #[error("MIME encoding failed: {0}")]
    Encoding(String),

    /// Failure reported by the transport or vendor collaborator.
    #[error("transport error: {0}")]
    Transport(String),

    /// Failover dispatcher constructed without any senders.
    #[error("at least one sender must be given")]
    NoSenders,

    /// Every sender in a failover chain failed.
    #[error("{0}")]
    AllFailed(FailedAttempts),

    /// Sender list exhausted without a result or a recorded failure.
    #[error("sender list exhausted without a recorded failure")]
    Exhausted,
}

impl Error {
    /// Wraps a collaborator failure as a transport error.
    pub fn transport(err: impl fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Per-sender failures recorded during one failover pass.
///
/// Failures accumulate as a stack: the display output lists the most
/// recently attempted sender first, each line as `index: error`.
#[derive(Debug, Default)]
pub struct FailedAttempts(Vec<(usize, Error)>);

impl FailedAttempts {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Records a failure for the sender at `index`.
    pub fn record(&mut self, index: usize, error: Error) {
        self.0.push((index, error));
    }

    /// Returns true if no failure has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates failures in attempt order (index 0 first).
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Error)> {
        self.0.iter().map(|(index, error)| (*index, error))
    }
}

impl fmt::Display for FailedAttempts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, (index, error)) in self.0.iter().rev().enumerate() {
            if pos > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{index}: {error}")?;
        }
        Ok(())
    }
}
