//! # mailover-smtp
//!
//! Raw SMTP sender for mailover.
//!
//! Builds the MIME message by hand (via `mailover-mime`) and delivers it
//! over a direct SMTP dialogue: greeting, EHLO, optional STARTTLS or
//! implicit TLS, AUTH PLAIN/LOGIN, MAIL FROM, RCPT TO, DATA, QUIT.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailover::{Email, Sender};
//! use mailover_smtp::{Security, SmtpConfig, SmtpSender};
//!
//! let sender = SmtpSender::new(SmtpConfig {
//!     name: "primary-smtp".to_string(),
//!     host: "smtp.example.com".to_string(),
//!     port: 587,
//!     username: "user@example.com".to_string(),
//!     password: "password".to_string(),
//!     security: Security::StartTls,
//! });
//!
//! let delivery = sender.send(&email).await?;
//! println!("accepted as {}", delivery.message_id);
//! ```
//!
//! ## Modules
//!
//! - [`command`]: SMTP command serialization
//! - [`reply`]: reply codes and the response parser
//! - [`client`]: the sequential dialogue client, generic over the stream
//! - [`stream`]: TCP/TLS connection setup

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod client;
pub mod command;
mod error;
pub mod reply;
mod sender;
pub mod stream;

pub use client::{Client, ServerInfo};
pub use command::{AuthMechanism, Command};
pub use error::{Error, Result};
pub use reply::{Reply, ReplyCode};
pub use sender::{deliver_message, envelope_recipients, Security, SmtpConfig, SmtpSender};
