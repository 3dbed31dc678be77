//! Serialization of an email into a multipart MIME byte stream.

use crate::content_type::content_type_for;
use crate::encoding::{encode_base64_wrapped, encoded_word};
use crate::error::Result;
use crate::mailbox::format_address_list;
use crate::message_id::MessageIdSource;
use chrono::Local;
use mailover::Email;
use std::fmt::Write as _;

/// Boundary token for the outer `multipart/mixed` envelope.
///
/// Fixed literals keep the output deterministic, at the cost of
/// corrupting a message whose body contains the literal delimiter line.
pub const OUTER_BOUNDARY: &str = "boundary-outer";

/// Boundary token for the inner `multipart/alternative` body.
pub const INNER_BOUNDARY: &str = "boundary";

/// A fully serialized MIME message.
#[derive(Debug, Clone)]
pub struct RenderedMessage {
    /// The generated `Message-ID` header value, including angle brackets.
    pub message_id: String,
    /// The complete message, headers through closing boundary.
    pub bytes: Vec<u8>,
}

/// Serializes `email` into a multipart MIME message.
///
/// `host` is the sending host, used for the `Message-ID` domain part.
/// The output is deterministic apart from the `Message-ID` and `Date`
/// headers: header order, boundary tokens, and the 76-character base64
/// line width are fixed.
///
/// The outer `multipart/mixed` envelope is emitted even when there are
/// no attachments, so the message shape does not depend on the
/// attachment count.
///
/// # Errors
///
/// Returns an error if the email has no body or Message-ID generation
/// fails.
pub fn render_message(
    email: &Email,
    host: &str,
    ids: &dyn MessageIdSource,
) -> Result<RenderedMessage> {
    email.validate().map_err(crate::Error::Invalid)?;

    let message_id = ids.message_id(host)?;
    let date = Local::now().format("%a, %d %b %Y %H:%M:%S %z");
    let from = format!("{}<{}>", email.from_name, email.from);
    let tos = format_address_list(&email.to, &email.to_names);
    let ccs = format_address_list(&email.cc, &email.cc_names);

    let mut msg = String::new();

    write!(msg, "Message-ID: {message_id}\r\n")?;
    write!(msg, "Date: {date}\r\n")?;
    write!(msg, "From: {from}\r\n")?;
    write!(msg, "To: {}\r\n", tos.join(";"))?;
    if !ccs.is_empty() {
        write!(msg, "Cc: {}\r\n", ccs.join(";"))?;
    }
    if !email.reply_to.is_empty() {
        write!(
            msg,
            "Reply-To: {}<{}>\r\n",
            email.reply_to_name, email.reply_to
        )?;
    }
    write!(msg, "Subject: {}\r\n", email.subject)?;
    msg.push_str("MIME-Version: 1.0\r\n");

    // Outer mixed envelope, then the alternative body inside it.
    write!(
        msg,
        "Content-Type: multipart/mixed; boundary=\"{OUTER_BOUNDARY}\"\r\n"
    )?;
    write!(msg, "\r\n--{OUTER_BOUNDARY}\r\n")?;
    write!(
        msg,
        "Content-Type: multipart/alternative; boundary=\"{INNER_BOUNDARY}\"\r\n"
    )?;

    if !email.text_body.is_empty() {
        write!(msg, "\r\n--{INNER_BOUNDARY}\r\n")?;
        msg.push_str("Content-Transfer-Encoding: 7bit\r\n");
        msg.push_str("Content-Type: text/plain; charset=\"utf-8\"\r\n");
        write!(msg, "\r\n{}\r\n", email.text_body)?;
    }

    if !email.html_body.is_empty() {
        write!(msg, "\r\n--{INNER_BOUNDARY}\r\n")?;
        msg.push_str("Content-Transfer-Encoding: 7bit\r\n");
        msg.push_str("Content-Type: text/html; charset=\"utf-8\"\r\n");
        write!(msg, "\r\n{}\r\n", email.html_body)?;
    }

    write!(msg, "\r\n--{INNER_BOUNDARY}--\r\n")?;

    for attachment in &email.attachments {
        write!(msg, "\r\n--{OUTER_BOUNDARY}\r\n")?;
        write!(msg, "Content-ID: <{}>\r\n", attachment.filename)?;
        write!(
            msg,
            "Content-Type: {}\r\n",
            content_type_for(&attachment.filename)
        )?;
        msg.push_str("Content-Transfer-Encoding: base64\r\n");
        if !attachment.inline {
            write!(
                msg,
                "Content-Disposition: attachment; filename=\"{}\"\r\n",
                encoded_word(&attachment.filename)
            )?;
        }
        msg.push_str("\r\n");
        msg.push_str(&encode_base64_wrapped(&attachment.data));
    }

    write!(msg, "\r\n--{OUTER_BOUNDARY}--\r\n")?;

    Ok(RenderedMessage {
        message_id,
        bytes: msg.into_bytes(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use mailover::Attachment;

    /// Deterministic ID source for byte-exact assertions.
    struct FixedIds(&'static str);

    impl MessageIdSource for FixedIds {
        fn message_id(&self, host: &str) -> Result<String> {
            Ok(format!("<{}@{host}>", self.0))
        }
    }

    /// ID source with its entropy pulled out from under it.
    struct BrokenIds;

    impl MessageIdSource for BrokenIds {
        fn message_id(&self, _host: &str) -> Result<String> {
            Err(Error::MessageId("entropy source unavailable".to_string()))
        }
    }

    fn sample_email() -> Email {
        Email {
            to: vec!["alice@example.com".to_string(), "bob@example.com".to_string()],
            to_names: vec!["Alice".to_string(), "Bob".to_string()],
            from: "sender@example.com".to_string(),
            from_name: "Sender".to_string(),
            subject: "Greetings".to_string(),
            text_body: "plain text".to_string(),
            html_body: "<p>rich text</p>".to_string(),
            ..Email::default()
        }
    }

    fn render_to_string(email: &Email) -> String {
        let rendered = render_message(email, "mail.example.com", &FixedIds("fixed-id")).unwrap();
        String::from_utf8(rendered.bytes).unwrap()
    }

    #[test]
    fn test_header_order() {
        let msg = render_to_string(&sample_email());
        let lines: Vec<&str> = msg.split("\r\n").collect();

        assert_eq!(lines[0], "Message-ID: <fixed-id@mail.example.com>");
        assert!(lines[1].starts_with("Date: "));
        assert_eq!(lines[2], "From: Sender<sender@example.com>");
        assert_eq!(
            lines[3],
            "To: Alice <alice@example.com>;Bob <bob@example.com>"
        );
        assert_eq!(lines[4], "Subject: Greetings");
        assert_eq!(lines[5], "MIME-Version: 1.0");
        assert_eq!(
            lines[6],
            "Content-Type: multipart/mixed; boundary=\"boundary-outer\""
        );
    }

    #[test]
    fn test_singleton_headers() {
        let msg = render_to_string(&sample_email());
        assert_eq!(msg.matches("Message-ID: ").count(), 1);
        assert_eq!(msg.matches("Date: ").count(), 1);
        assert_eq!(msg.matches("Subject: ").count(), 1);
        assert_eq!(msg.matches("MIME-Version: 1.0").count(), 1);
    }

    #[test]
    fn test_cc_and_reply_to_omitted_when_empty() {
        let msg = render_to_string(&sample_email());
        assert!(!msg.contains("Cc: "));
        assert!(!msg.contains("Reply-To: "));
    }

    #[test]
    fn test_cc_and_reply_to_present() {
        let email = Email {
            cc: vec!["carol@example.com".to_string()],
            reply_to: "replies@example.com".to_string(),
            reply_to_name: "Replies".to_string(),
            ..sample_email()
        };
        let msg = render_to_string(&email);
        assert!(msg.contains("Cc: <carol@example.com>\r\n"));
        assert!(msg.contains("Reply-To: Replies<replies@example.com>\r\n"));
    }

    #[test]
    fn test_alternative_parts() {
        let msg = render_to_string(&sample_email());
        assert!(msg.contains(
            "\r\n--boundary\r\nContent-Transfer-Encoding: 7bit\r\nContent-Type: text/plain; charset=\"utf-8\"\r\n\r\nplain text\r\n"
        ));
        assert!(msg.contains(
            "\r\n--boundary\r\nContent-Transfer-Encoding: 7bit\r\nContent-Type: text/html; charset=\"utf-8\"\r\n\r\n<p>rich text</p>\r\n"
        ));
        assert!(msg.contains("\r\n--boundary--\r\n"));
    }

    #[test]
    fn test_text_only_email_has_no_html_part() {
        let email = Email {
            html_body: String::new(),
            ..sample_email()
        };
        let msg = render_to_string(&email);
        assert!(msg.contains("text/plain"));
        assert!(!msg.contains("text/html"));
    }

    #[test]
    fn test_outer_envelope_kept_without_attachments() {
        let msg = render_to_string(&sample_email());
        assert!(msg.contains("multipart/mixed"));
        assert!(msg.ends_with("\r\n--boundary-outer--\r\n"));
    }

    #[test]
    fn test_inline_attachment_part() {
        let email = Email {
            attachments: vec![Attachment {
                filename: "logo.png".to_string(),
                data: b"fake png bytes".to_vec(),
                inline: true,
            }],
            ..sample_email()
        };
        let msg = render_to_string(&email);

        assert!(msg.contains("Content-ID: <logo.png>\r\n"));
        assert!(msg.contains("Content-Type: image/png\r\n"));
        assert!(msg.contains("Content-Transfer-Encoding: base64\r\n"));
        assert!(!msg.contains("Content-Disposition"));
    }

    #[test]
    fn test_download_attachment_part() {
        let email = Email {
            attachments: vec![Attachment {
                filename: "logo.png".to_string(),
                data: b"fake png bytes".to_vec(),
                inline: false,
            }],
            ..sample_email()
        };
        let msg = render_to_string(&email);

        assert!(msg.contains("Content-ID: <logo.png>\r\n"));
        assert!(msg.contains(
            "Content-Disposition: attachment; filename=\"=?UTF-8?B?bG9nby5wbmc=?=\"\r\n"
        ));
    }

    #[test]
    fn test_attachment_base64_round_trip() {
        let data: Vec<u8> = (0..=255).collect();
        let email = Email {
            attachments: vec![Attachment {
                filename: "blob.bin".to_string(),
                data: data.clone(),
                inline: false,
            }],
            ..sample_email()
        };
        let msg = render_to_string(&email);

        // The base64 body sits between the blank line after the part
        // headers and the closing outer boundary.
        let start = msg.find("base64\r\n").unwrap();
        let body_start = msg[start..].find("\r\n\r\n").unwrap() + start + 4;
        let body_end = msg.rfind("\r\n--boundary-outer--").unwrap();
        let body: String = msg[body_start..body_end].split("\r\n").collect();

        assert_eq!(STANDARD.decode(body).unwrap(), data);
    }

    #[test]
    fn test_each_attachment_gets_own_part() {
        let email = Email {
            attachments: vec![
                Attachment {
                    filename: "a.txt".to_string(),
                    data: b"first".to_vec(),
                    inline: false,
                },
                Attachment {
                    filename: "b.txt".to_string(),
                    data: b"second".to_vec(),
                    inline: false,
                },
            ],
            ..sample_email()
        };
        let msg = render_to_string(&email);

        assert_eq!(msg.matches("\r\n--boundary-outer\r\n").count(), 3);
        assert!(msg.contains("Content-ID: <a.txt>"));
        assert!(msg.contains("Content-ID: <b.txt>"));
    }

    #[test]
    fn test_unknown_attachment_type_falls_back() {
        let email = Email {
            attachments: vec![Attachment {
                filename: "data.weird".to_string(),
                data: b"?".to_vec(),
                inline: false,
            }],
            ..sample_email()
        };
        let msg = render_to_string(&email);
        assert!(msg.contains("Content-Type: application/octet-stream\r\n"));
    }

    #[test]
    fn test_empty_bodies_rejected() {
        let email = Email {
            text_body: String::new(),
            html_body: String::new(),
            ..sample_email()
        };
        let err = render_message(&email, "h", &FixedIds("x")).unwrap_err();
        assert!(matches!(
            err,
            Error::Invalid(mailover::Error::MissingBody)
        ));
    }

    #[test]
    fn test_message_id_failure_propagates() {
        let err = render_message(&sample_email(), "h", &BrokenIds).unwrap_err();
        assert!(matches!(err, Error::MessageId(_)));
    }

    #[test]
    fn test_returned_message_id_matches_header() {
        let rendered =
            render_message(&sample_email(), "mail.example.com", &FixedIds("abc")).unwrap();
        assert_eq!(rendered.message_id, "<abc@mail.example.com>");
        let msg = String::from_utf8(rendered.bytes).unwrap();
        assert!(msg.starts_with("Message-ID: <abc@mail.example.com>\r\n"));
    }
}
