//! # mailover-postmark
//!
//! Postmark adapter for mailover.
//!
//! A thin field-mapping shim: translates the common email model into a
//! JSON POST against the Postmark email API and reports the
//! provider-assigned message ID. Failures, including Postmark's
//! in-body error codes, surface uniformly as transport errors.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailover::Sender;
//! use mailover_postmark::Postmark;
//!
//! let postmark = Postmark::new("postmark", "server-token");
//! let delivery = postmark.send(&email).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use async_trait::async_trait;
use mailover::{Delivery, Email, Error, Result, Sender};
use mailover_mime::content_type_for;
use mailover_mime::encoding::encode_base64;
use serde::{Deserialize, Serialize};

/// Postmark email API endpoint.
const DEFAULT_ENDPOINT: &str = "https://api.postmarkapp.com";

/// Postmark email API request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendRequest {
    from: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    reply_to: String,
    to: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    cc: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    bcc: String,
    subject: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    text_body: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    html_body: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<AttachmentPayload>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct AttachmentPayload {
    name: String,
    content: String,
    content_type: String,
    #[serde(rename = "ContentID", skip_serializing_if = "Option::is_none")]
    content_id: Option<String>,
}

/// Postmark email API response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SendResponse {
    #[serde(rename = "MessageID", default)]
    message_id: String,
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    message: String,
}

/// Sender backed by the Postmark HTTP email API.
#[derive(Debug, Clone)]
pub struct Postmark {
    name: String,
    token: String,
    endpoint: String,
    client: reqwest::Client,
}

impl Postmark {
    /// Creates an adapter authenticated by a Postmark server token.
    #[must_use]
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: token.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Overrides the API endpoint (tests).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn build_request(email: &Email) -> SendRequest {
        let attachments = email
            .attachments
            .iter()
            .map(|attachment| AttachmentPayload {
                name: attachment.filename.clone(),
                content: encode_base64(&attachment.data),
                content_type: content_type_for(&attachment.filename).to_string(),
                content_id: attachment
                    .inline
                    .then(|| format!("cid:{}", attachment.filename)),
            })
            .collect();

        SendRequest {
            from: mailbox(&email.from_name, &email.from),
            reply_to: mailbox(&email.reply_to_name, &email.reply_to),
            to: address_list(&email.to, &email.to_names),
            cc: address_list(&email.cc, &email.cc_names),
            bcc: address_list(&email.bcc, &email.bcc_names),
            subject: email.subject.clone(),
            text_body: email.text_body.clone(),
            html_body: email.html_body.clone(),
            attachments,
        }
    }
}

#[async_trait]
impl Sender for Postmark {
    async fn send(&self, email: &Email) -> Result<Delivery> {
        email.validate()?;

        tracing::debug!(
            provider = %self.name,
            subject = %email.subject,
            "sending via Postmark"
        );

        let response = self
            .client
            .post(format!("{}/email", self.endpoint))
            .header("Accept", "application/json")
            .header("X-Postmark-Server-Token", &self.token)
            .json(&Self::build_request(email))
            .send()
            .await
            .map_err(Error::transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!(
                "postmark returned {status}: {body}"
            )));
        }

        let parsed: SendResponse = response.json().await.map_err(Error::transport)?;
        if parsed.error_code != 0 {
            return Err(Error::Transport(format!(
                "postmark error {}: {}",
                parsed.error_code, parsed.message
            )));
        }

        Ok(Delivery {
            provider: self.name.clone(),
            message_id: parsed.message_id,
        })
    }
}

/// Formats a single mailbox, applying the display name when present.
fn mailbox(name: &str, address: &str) -> String {
    if name.is_empty() {
        address.to_string()
    } else {
        format!("{name}<{address}>")
    }
}

/// Comma-joins addresses with their parallel display names.
fn address_list(addresses: &[String], names: &[String]) -> String {
    addresses
        .iter()
        .enumerate()
        .map(|(i, address)| {
            let name = names.get(i).map_or("", String::as_str);
            if name.is_empty() {
                address.clone()
            } else {
                format!("{name} <{address}>")
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mailover::Attachment;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_email() -> Email {
        Email {
            to: vec!["alice@example.com".to_string(), "bob@example.com".to_string()],
            to_names: vec!["Alice".to_string(), "Bob".to_string()],
            from: "sender@example.com".to_string(),
            subject: "Hi".to_string(),
            text_body: "plain".to_string(),
            ..Email::default()
        }
    }

    #[test]
    fn test_address_list_pairs_names() {
        let email = sample_email();
        assert_eq!(
            address_list(&email.to, &email.to_names),
            "Alice <alice@example.com>,Bob <bob@example.com>"
        );
    }

    #[test]
    fn test_address_list_without_names() {
        let addresses = vec!["a@x.com".to_string(), "b@x.com".to_string()];
        assert_eq!(address_list(&addresses, &[]), "a@x.com,b@x.com");
    }

    #[test]
    fn test_inline_attachment_gets_cid() {
        let email = Email {
            attachments: vec![
                Attachment {
                    filename: "logo.png".to_string(),
                    data: b"png".to_vec(),
                    inline: true,
                },
                Attachment {
                    filename: "terms.pdf".to_string(),
                    data: b"pdf".to_vec(),
                    inline: false,
                },
            ],
            ..sample_email()
        };

        let request = Postmark::build_request(&email);
        assert_eq!(
            request.attachments[0].content_id.as_deref(),
            Some("cid:logo.png")
        );
        assert_eq!(request.attachments[0].content_type, "image/png");
        assert!(request.attachments[1].content_id.is_none());
        assert_eq!(request.attachments[1].content_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_send_reports_provider_and_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/email"))
            .and(header("X-Postmark-Server-Token", "server-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "To": "alice@example.com",
                "SubmittedAt": "2026-08-08T10:00:00Z",
                "MessageID": "pm-0001",
                "ErrorCode": 0,
                "Message": "OK"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let postmark =
            Postmark::new("postmark-fallback", "server-token").with_endpoint(server.uri());

        let delivery = postmark.send(&sample_email()).await.unwrap();
        assert_eq!(delivery.provider, "postmark-fallback");
        assert_eq!(delivery.message_id, "pm-0001");
    }

    #[tokio::test]
    async fn test_api_error_code_is_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/email"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ErrorCode": 300,
                "Message": "Invalid email request"
            })))
            .mount(&server)
            .await;

        let postmark = Postmark::new("pm", "token").with_endpoint(server.uri());

        let err = postmark.send(&sample_email()).await.unwrap_err();
        match err {
            Error::Transport(msg) => {
                assert!(msg.contains("300"));
                assert!(msg.contains("Invalid email request"));
            }
            other => panic!("expected Transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_rejection_is_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/email"))
            .respond_with(ResponseTemplate::new(422).set_body_string("Unprocessable"))
            .mount(&server)
            .await;

        let postmark = Postmark::new("pm", "token").with_endpoint(server.uri());

        let err = postmark.send(&sample_email()).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_missing_body_rejected_before_http() {
        let email = Email {
            text_body: String::new(),
            ..sample_email()
        };

        let postmark = Postmark::new("pm", "token");
        assert!(matches!(
            postmark.send(&email).await,
            Err(Error::MissingBody)
        ));
    }
}
