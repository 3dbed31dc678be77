//! # mailover
//!
//! Provider-agnostic email sending with sequential failover.
//!
//! This crate defines the common email model, the [`Sender`] capability,
//! and the [`Failover`] dispatcher that tries an ordered list of senders
//! until one succeeds. Concrete senders live in sibling crates:
//! `mailover-smtp` (raw SMTP with hand-built MIME), `mailover-mailgun`
//! and `mailover-postmark` (HTTP vendor adapters).
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailover::{Email, Failover, Sender};
//!
//! let email = Email {
//!     to: vec!["recipient@example.com".to_string()],
//!     from: "sender@example.com".to_string(),
//!     subject: "Hello".to_string(),
//!     text_body: "Hello, World!".to_string(),
//!     ..Email::default()
//! };
//!
//! let failover = Failover::new(vec![primary, fallback])?;
//! let delivery = failover.send(&email).await?;
//! println!("sent via {} as {}", delivery.provider, delivery.message_id);
//! ```
//!
//! ## Failover semantics
//!
//! Senders are tried strictly in order, one at a time. The first success
//! wins and suppresses every earlier failure. If all senders fail, the
//! returned error aggregates each attempt, most recent first.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
mod failover;
mod model;
mod sender;

pub use error::{Error, FailedAttempts, Result};
pub use failover::Failover;
pub use model::{Attachment, Email};
pub use sender::{Delivery, Sender};
