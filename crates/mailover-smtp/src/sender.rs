//! The raw-SMTP sender.

use crate::client::Client;
use crate::command::AuthMechanism;
use crate::error::{Error, Result};
use crate::stream;
use async_trait::async_trait;
use mailover::{Delivery, Email, Sender};
use mailover_mime::{render_message, MessageIdSource, UuidSource};
use tokio::io::{AsyncRead, AsyncWrite};

/// Channel security for the SMTP connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    /// Plain TCP. Only sensible against localhost relays.
    None,
    /// Plain TCP upgraded via STARTTLS (typically port 587).
    #[default]
    StartTls,
    /// Implicit TLS from the first byte (typically port 465).
    Implicit,
}

/// Configuration for an [`SmtpSender`].
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Provider name reported in [`Delivery::provider`].
    pub name: String,
    /// SMTP host. Also the Message-ID domain part.
    pub host: String,
    /// SMTP port.
    pub port: u16,
    /// Username for AUTH. Empty disables authentication.
    pub username: String,
    /// Password for AUTH.
    pub password: String,
    /// Channel security.
    pub security: Security,
}

/// Sends email by speaking SMTP directly, with a hand-built MIME message.
///
/// A send validates the email, serializes it through `mailover-mime`,
/// then drives one complete SMTP dialogue: greeting, EHLO, the configured
/// TLS upgrade, AUTH, MAIL FROM, one RCPT TO per envelope recipient,
/// DATA, QUIT.
pub struct SmtpSender {
    config: SmtpConfig,
    ids: Box<dyn MessageIdSource>,
}

impl SmtpSender {
    /// Creates a sender with random UUID message IDs.
    #[must_use]
    pub fn new(config: SmtpConfig) -> Self {
        Self {
            config,
            ids: Box::new(UuidSource),
        }
    }

    /// Replaces the Message-ID source. Tests use this to pin IDs.
    #[must_use]
    pub fn with_id_source(mut self, ids: Box<dyn MessageIdSource>) -> Self {
        self.ids = ids;
        self
    }

    async fn deliver(&self, from: &str, recipients: &[&str], message: &[u8]) -> Result<()> {
        let config = &self.config;
        let credentials = (!config.username.is_empty())
            .then(|| (config.username.as_str(), config.password.as_str()));

        tracing::debug!(
            host = %config.host,
            port = config.port,
            security = ?config.security,
            recipients = recipients.len(),
            "delivering via SMTP"
        );

        match config.security {
            Security::Implicit => {
                let stream = stream::connect_tls(&config.host, config.port).await?;
                let mut client = Client::connect(stream).await?;
                client.ehlo(&config.host).await?;
                deliver_message(&mut client, credentials, from, recipients, message).await
            }
            Security::None => {
                let stream = stream::connect(&config.host, config.port).await?;
                let mut client = Client::connect(stream).await?;
                client.ehlo(&config.host).await?;
                deliver_message(&mut client, credentials, from, recipients, message).await
            }
            Security::StartTls => {
                let stream = stream::connect(&config.host, config.port).await?;
                let mut client = Client::connect(stream).await?;
                client.ehlo(&config.host).await?;
                client.starttls_request().await?;

                let (stream, server) = client.into_parts();
                let tls = stream::upgrade(stream, &config.host).await?;
                let mut client = Client::resume(tls, server);
                client.ehlo(&config.host).await?;
                deliver_message(&mut client, credentials, from, recipients, message).await
            }
        }
    }
}

#[async_trait]
impl Sender for SmtpSender {
    async fn send(&self, email: &Email) -> mailover::Result<Delivery> {
        email.validate()?;

        let rendered = render_message(email, &self.config.host, &*self.ids)
            .map_err(mailover::Error::from)?;
        let recipients = envelope_recipients(email);

        self.deliver(&email.from, &recipients, &rendered.bytes)
            .await
            .map_err(mailover::Error::from)?;

        tracing::debug!(
            provider = %self.config.name,
            message_id = %rendered.message_id,
            "message accepted"
        );

        Ok(Delivery {
            provider: self.config.name.clone(),
            message_id: rendered.message_id,
        })
    }
}

/// Aggregates the envelope recipient list: To, then Cc, then Bcc.
#[must_use]
pub fn envelope_recipients(email: &Email) -> Vec<&str> {
    email
        .to
        .iter()
        .chain(email.cc.iter())
        .chain(email.bcc.iter())
        .map(String::as_str)
        .collect()
}

/// Drives one mail transaction over an established, greeted client.
///
/// Authenticates when `credentials` is set, preferring AUTH PLAIN and
/// falling back to AUTH LOGIN when the server only advertises LOGIN.
/// Exposed so tests and custom transports can reuse the dialogue.
///
/// # Errors
///
/// Returns an error on any rejected step of the dialogue.
pub async fn deliver_message<S>(
    client: &mut Client<S>,
    credentials: Option<(&str, &str)>,
    from: &str,
    recipients: &[&str],
    message: &[u8],
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    if let Some((username, password)) = credentials {
        let auth_line = client.server_info().auth_line().map(ToString::to_string);
        let mechanisms = client.server_info().auth_mechanisms();

        match auth_line {
            // Servers that advertise nothing still get PLAIN; only an
            // AUTH line without a mechanism we speak is a hard error.
            None => client.auth_plain(username, password).await?,
            Some(_) if mechanisms.contains(&AuthMechanism::Plain) => {
                client.auth_plain(username, password).await?;
            }
            Some(_) if mechanisms.contains(&AuthMechanism::Login) => {
                client.auth_login(username, password).await?;
            }
            Some(line) => return Err(Error::NoAuthMechanism(line)),
        }
    }

    client.mail_from(from).await?;
    for recipient in recipients {
        client.rcpt_to(recipient).await?;
    }
    client.data(message).await?;
    client.quit().await?;

    Ok(())
}
