//! # mailover-mime
//!
//! MIME multipart message generation for the raw-SMTP send path.
//!
//! Serializes a [`mailover::Email`] into a complete RFC 5322 message with
//! a `multipart/mixed` envelope, a nested `multipart/alternative` body,
//! and base64-encoded attachment parts, suitable for an SMTP `DATA`
//! command. No MIME library is involved; the wire format is assembled
//! by hand and is deterministic apart from the `Message-ID` and `Date`
//! headers.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailover::Email;
//! use mailover_mime::{render_message, UuidSource};
//!
//! let email = Email {
//!     to: vec!["recipient@example.com".to_string()],
//!     from: "sender@example.com".to_string(),
//!     subject: "Test".to_string(),
//!     text_body: "Hello, World!".to_string(),
//!     ..Email::default()
//! };
//!
//! let rendered = render_message(&email, "mail.example.com", &UuidSource)?;
//! assert!(rendered.bytes.starts_with(b"Message-ID: <"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod error;
mod mailbox;
mod message_id;
mod render;

pub mod encoding;

pub use content_type::content_type_for;
pub use error::{Error, Result};
pub use mailbox::{format_address_list, format_mailbox};
pub use message_id::{MessageIdSource, UuidSource};
pub use render::{render_message, RenderedMessage, INNER_BOUNDARY, OUTER_BOUNDARY};
