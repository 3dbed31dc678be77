//! Provider-neutral email model.

use crate::error::{Error, Result};

/// An email to send.
///
/// The `to_names`, `cc_names` and `bcc_names` sequences are parallel to
/// their address counterparts: each must be empty or pair `names[i]` with
/// the address at the same index. An empty string at index `i` means that
/// recipient has no display name. When a name sequence is shorter than its
/// address sequence, addresses past its end get no display name.
///
/// Values are read-only for the lifetime of a single send call; no sender
/// retains them.
#[derive(Debug, Clone, Default)]
pub struct Email {
    /// Primary recipient addresses.
    pub to: Vec<String>,
    /// Carbon-copy recipient addresses.
    pub cc: Vec<String>,
    /// Blind-carbon-copy recipient addresses.
    pub bcc: Vec<String>,
    /// Display names parallel to `to`.
    pub to_names: Vec<String>,
    /// Display names parallel to `cc`.
    pub cc_names: Vec<String>,
    /// Display names parallel to `bcc`.
    pub bcc_names: Vec<String>,
    /// Sender address.
    pub from: String,
    /// Sender display name.
    pub from_name: String,
    /// Reply-To address. Empty means no Reply-To header.
    pub reply_to: String,
    /// Reply-To display name.
    pub reply_to_name: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body. May be empty if `html_body` is set.
    pub text_body: String,
    /// HTML body. May be empty if `text_body` is set.
    pub html_body: String,
    /// Attachments, in presentation order.
    pub attachments: Vec<Attachment>,
}

impl Email {
    /// Checks the structural requirements for sending.
    ///
    /// A message must have at least one renderable body. Address syntax is
    /// deliberately not checked here; that is the transport's concern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingBody`] if both bodies are empty.
    pub fn validate(&self) -> Result<()> {
        if self.text_body.is_empty() && self.html_body.is_empty() {
            return Err(Error::MissingBody);
        }
        Ok(())
    }
}

/// An email attachment.
#[derive(Debug, Clone, Default)]
pub struct Attachment {
    /// File name. Also used to derive the MIME type and, for inline
    /// parts, the content ID referenced from the HTML body.
    pub filename: String,
    /// Raw attachment bytes.
    pub data: Vec<u8>,
    /// True when the attachment is referenced by content ID from the HTML
    /// body rather than presented as a download.
    pub inline: bool,
}
