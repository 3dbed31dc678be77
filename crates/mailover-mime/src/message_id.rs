//! Message-ID generation.

use crate::error::Result;
use uuid::Uuid;

/// Source of globally unique Message-ID header values.
///
/// Abstracted so tests can pin deterministic IDs; production code uses
/// [`UuidSource`].
pub trait MessageIdSource: Send + Sync {
    /// Produces a Message-ID of the form `<unique@host>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MessageId`](crate::Error::MessageId) if the
    /// source cannot produce an identifier (for example when an external
    /// entropy source is unavailable).
    fn message_id(&self, host: &str) -> Result<String>;
}

/// Message-ID source backed by random version-4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSource;

impl MessageIdSource for UuidSource {
    fn message_id(&self, host: &str) -> Result<String> {
        Ok(format!("<{}@{host}>", Uuid::new_v4()))
    }
}
