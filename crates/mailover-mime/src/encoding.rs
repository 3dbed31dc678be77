//! Base64 and RFC 2047 encoding utilities.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Maximum number of encoded characters per base64 body line.
const MAX_LINE_LENGTH: usize = 76;

/// Encodes data as a single unwrapped Base64 string.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Encodes data as Base64 wrapped at exactly 76 characters per line.
///
/// Wrapping counts output characters, never input bytes: every line is
/// 76 characters long except possibly the last, and lines are separated
/// by CRLF with no trailing break.
#[must_use]
pub fn encode_base64_wrapped(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let mut wrapped = String::with_capacity(encoded.len() + encoded.len() / MAX_LINE_LENGTH * 2);

    for (i, chunk) in encoded.as_bytes().chunks(MAX_LINE_LENGTH).enumerate() {
        if i > 0 {
            wrapped.push_str("\r\n");
        }
        // Chunks of the base64 alphabet are always valid UTF-8.
        wrapped.push_str(&String::from_utf8_lossy(chunk));
    }

    wrapped
}

/// Encodes text as an RFC 2047 encoded-word, unconditionally.
///
/// Format: `=?UTF-8?B?<base64>?=`. Used for attachment filenames, which
/// are always encoded regardless of content.
#[must_use]
pub fn encoded_word(text: &str) -> String {
    format!("=?UTF-8?B?{}?=", encode_base64(text.as_bytes()))
}

/// Encodes a header phrase with RFC 2047 only when necessary.
///
/// ASCII text free of `=` and `?` passes through unchanged; anything else
/// becomes a B-encoded word.
#[must_use]
pub fn encode_phrase(text: &str) -> String {
    if text.chars().all(|c| c.is_ascii() && c != '=' && c != '?') {
        return text.to_string();
    }
    encoded_word(text)
}
