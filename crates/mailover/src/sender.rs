//! The sender capability.

use crate::error::Result;
use crate::model::Email;
use async_trait::async_trait;

/// Outcome of a successful send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Name of the sender that delivered the message. Relevant when the
    /// send went through a [`Failover`](crate::Failover) chain.
    pub provider: String,
    /// Transport- or provider-assigned identifier for the sent message,
    /// used for tracking and webhooks.
    pub message_id: String,
}

/// Anything that can attempt delivery of one [`Email`].
///
/// Implementations must not retain the email beyond the call. Dropping
/// the returned future abandons the in-flight attempt.
#[async_trait]
pub trait Sender: Send + Sync {
    /// Attempts delivery of `email`.
    ///
    /// # Errors
    ///
    /// Returns an error when validation, encoding, or the underlying
    /// transport fails. A failed attempt reports no partial delivery.
    async fn send(&self, email: &Email) -> Result<Delivery>;
}
