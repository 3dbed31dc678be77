//! Sequential multi-sender failover.

use crate::error::{Error, FailedAttempts, Result};
use crate::model::Email;
use crate::sender::{Delivery, Sender};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Tries an ordered list of senders until one succeeds.
///
/// Ordering encodes preference: index 0 is the primary provider, later
/// indices are fallbacks. Senders are invoked strictly one at a time,
/// never concurrently, so a fallback is only reached once every earlier
/// sender has failed. Racing them in parallel would defeat the preference
/// order and risk duplicate delivery.
///
/// A success suppresses every earlier failure in the same call. If all
/// senders fail, the error aggregates each attempt, most recent first.
pub struct Failover {
    senders: Vec<Box<dyn Sender>>,
}

impl Failover {
    /// Creates a failover chain from an ordered list of senders.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSenders`] if `senders` is empty.
    pub fn new(senders: Vec<Box<dyn Sender>>) -> Result<Self> {
        if senders.is_empty() {
            return Err(Error::NoSenders);
        }
        Ok(Self { senders })
    }

    /// Number of senders in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.senders.len()
    }

    /// Always false: construction rejects empty chains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}

impl std::fmt::Debug for Failover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Failover")
            .field("senders", &self.senders.len())
            .finish()
    }
}

#[async_trait]
impl Sender for Failover {
    async fn send(&self, email: &Email) -> Result<Delivery> {
        let mut failures = FailedAttempts::new();

        for (index, sender) in self.senders.iter().enumerate() {
            match sender.send(email).await {
                Ok(delivery) => {
                    if !failures.is_empty() {
                        debug!(
                            index,
                            provider = %delivery.provider,
                            skipped_failures = failures.len(),
                            "sender succeeded after earlier failures"
                        );
                    }
                    return Ok(delivery);
                }
                Err(error) => {
                    warn!(index, %error, "sender failed");
                    failures.record(index, error);
                }
            }
        }

        // The loop records a failure for every sender, so an empty record
        // here means the invariant broke; never report a silent success.
        if failures.is_empty() {
            return Err(Error::Exhausted);
        }
        Err(Error::AllFailed(failures))
    }
}
