//! # mailover-mailgun
//!
//! Mailgun adapter for mailover.
//!
//! A thin field-mapping shim: translates the common email model into a
//! multipart-form POST against the Mailgun messages API and reports the
//! provider-assigned message ID. All delivery mechanics live on
//! Mailgun's side; failures surface uniformly as transport errors.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailover::Sender;
//! use mailover_mailgun::Mailgun;
//!
//! let mailgun = Mailgun::new("mailgun-eu", "mg.example.com", "key-...");
//! let delivery = mailgun.send(&email).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use async_trait::async_trait;
use mailover::{Delivery, Email, Error, Result, Sender};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

/// Default Mailgun API endpoint.
const DEFAULT_ENDPOINT: &str = "https://api.mailgun.net";

/// Mailgun messages API response body.
#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

/// Sender backed by the Mailgun HTTP messages API.
#[derive(Debug, Clone)]
pub struct Mailgun {
    name: String,
    domain: String,
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl Mailgun {
    /// Creates an adapter for the given sending domain and API key.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        domain: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Overrides the API endpoint (regional endpoints, tests).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn messages_url(&self) -> String {
        format!("{}/v3/{}/messages", self.endpoint, self.domain)
    }

    fn build_form(&self, email: &Email) -> Form {
        let mut form = Form::new()
            .text("from", recipient(&email.from_name, &email.from))
            .text("subject", email.subject.clone());

        for (i, to) in email.to.iter().enumerate() {
            form = form.text("to", indexed_recipient(&email.to_names, i, to));
        }
        for (i, cc) in email.cc.iter().enumerate() {
            form = form.text("cc", indexed_recipient(&email.cc_names, i, cc));
        }
        for (i, bcc) in email.bcc.iter().enumerate() {
            form = form.text("bcc", indexed_recipient(&email.bcc_names, i, bcc));
        }

        if !email.text_body.is_empty() {
            form = form.text("text", email.text_body.clone());
        }
        if !email.html_body.is_empty() {
            form = form.text("html", email.html_body.clone());
        }
        if !email.reply_to.is_empty() {
            form = form.text(
                "h:Reply-To",
                recipient(&email.reply_to_name, &email.reply_to),
            );
        }

        for attachment in &email.attachments {
            let field = if attachment.inline { "inline" } else { "attachment" };
            let part = Part::bytes(attachment.data.clone()).file_name(attachment.filename.clone());
            form = form.part(field, part);
        }

        form
    }
}

#[async_trait]
impl Sender for Mailgun {
    async fn send(&self, email: &Email) -> Result<Delivery> {
        email.validate()?;

        tracing::debug!(
            provider = %self.name,
            domain = %self.domain,
            subject = %email.subject,
            "sending via Mailgun"
        );

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth("api", Some(&self.api_key))
            .multipart(self.build_form(email))
            .send()
            .await
            .map_err(Error::transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!(
                "mailgun returned {status}: {body}"
            )));
        }

        let parsed: SendResponse = response.json().await.map_err(Error::transport)?;

        Ok(Delivery {
            provider: self.name.clone(),
            message_id: parsed.id,
        })
    }
}

/// Formats a recipient, applying the display name when present.
fn recipient(name: &str, address: &str) -> String {
    if name.is_empty() {
        address.to_string()
    } else {
        format!("{name}<{address}>")
    }
}

/// Looks up the parallel display name for the address at `index`.
fn indexed_recipient(names: &[String], index: usize, address: &str) -> String {
    recipient(names.get(index).map_or("", String::as_str), address)
}
