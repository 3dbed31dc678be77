//! Sequential SMTP client.
//!
//! Generic over the underlying stream so tests can drive the full
//! dialogue against an in-memory mock.

use crate::command::{AuthMechanism, Command};
use crate::error::{Error, Result};
use crate::reply::{is_last_reply_line, parse_reply, Reply, ReplyCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

/// Server capabilities learned from the greeting and EHLO response.
#[derive(Debug, Clone, Default)]
pub struct ServerInfo {
    /// Server hostname from the greeting.
    pub hostname: String,
    /// Raw extension lines from the EHLO response.
    pub extensions: Vec<String>,
}

impl ServerInfo {
    /// Checks if STARTTLS is advertised.
    #[must_use]
    pub fn supports_starttls(&self) -> bool {
        self.extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case("STARTTLS"))
    }

    /// Advertised authentication mechanisms this client speaks.
    #[must_use]
    pub fn auth_mechanisms(&self) -> Vec<AuthMechanism> {
        let Some(line) = self
            .extensions
            .iter()
            .find(|ext| ext.to_ascii_uppercase().starts_with("AUTH "))
        else {
            return Vec::new();
        };

        line.split_whitespace()
            .skip(1)
            .filter_map(|token| match token.to_ascii_uppercase().as_str() {
                "PLAIN" => Some(AuthMechanism::Plain),
                "LOGIN" => Some(AuthMechanism::Login),
                _ => None,
            })
            .collect()
    }

    /// Raw AUTH line, for diagnostics.
    #[must_use]
    pub fn auth_line(&self) -> Option<&str> {
        self.extensions
            .iter()
            .find(|ext| ext.to_ascii_uppercase().starts_with("AUTH "))
            .map(String::as_str)
    }
}

/// SMTP client over an established stream.
///
/// Methods follow the wire dialogue in order: greeting (at construction),
/// [`ehlo`](Self::ehlo), optional [`starttls_request`](Self::starttls_request)
/// plus [`into_parts`](Self::into_parts) for the TLS upgrade, AUTH,
/// MAIL FROM / RCPT TO / DATA, QUIT.
#[derive(Debug)]
pub struct Client<S> {
    stream: BufReader<S>,
    server: ServerInfo,
}

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Creates a client from a fresh stream and reads the server greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the greeting is not 220.
    pub async fn connect(stream: S) -> Result<Self> {
        let mut client = Self {
            stream: BufReader::new(stream),
            server: ServerInfo::default(),
        };

        let greeting = client.read_reply().await?;
        if greeting.code != ReplyCode::SERVICE_READY {
            return Err(Error::smtp(
                greeting.code.as_u16(),
                greeting.message_text(),
            ));
        }

        client.server.hostname = greeting
            .message
            .first()
            .and_then(|msg| msg.split_whitespace().next())
            .unwrap_or_default()
            .to_string();

        Ok(client)
    }

    /// Resumes a dialogue on an upgraded stream (after STARTTLS).
    ///
    /// No greeting is read; the caller must re-issue EHLO.
    #[must_use]
    pub fn resume(stream: S, server: ServerInfo) -> Self {
        Self {
            stream: BufReader::new(stream),
            server,
        }
    }

    /// Returns the server information.
    #[must_use]
    pub const fn server_info(&self) -> &ServerInfo {
        &self.server
    }

    /// Consumes the client, returning the stream and server info.
    ///
    /// Used for the STARTTLS upgrade, which wraps the raw stream in TLS
    /// and [`resume`](Self::resume)s on the result.
    #[must_use]
    pub fn into_parts(self) -> (S, ServerInfo) {
        (self.stream.into_inner(), self.server)
    }

    /// Sends EHLO and records the advertised extensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn ehlo(&mut self, hostname: &str) -> Result<()> {
        let reply = self
            .command(&Command::Ehlo {
                hostname: hostname.to_string(),
            })
            .await?;

        if !reply.is_success() {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }

        // First line repeats the greeting; the rest are extensions.
        self.server.extensions = reply.message.iter().skip(1).cloned().collect();
        Ok(())
    }

    /// Requests the STARTTLS upgrade.
    ///
    /// On success the caller must take the stream via
    /// [`into_parts`](Self::into_parts), wrap it in TLS, and re-EHLO.
    ///
    /// # Errors
    ///
    /// Returns an error if the server refuses the upgrade.
    pub async fn starttls_request(&mut self) -> Result<()> {
        let reply = self.command(&Command::StartTls).await?;
        if reply.code != ReplyCode::SERVICE_READY {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }
        // Extensions no longer apply to the upgraded channel.
        self.server.extensions.clear();
        Ok(())
    }

    /// Authenticates with AUTH PLAIN (RFC 4616, SASL-IR form).
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the credentials.
    pub async fn auth_plain(&mut self, username: &str, password: &str) -> Result<()> {
        let identity = format!("\0{username}\0{password}");
        let reply = self
            .command(&Command::Auth {
                mechanism: AuthMechanism::Plain,
                initial_response: Some(STANDARD.encode(identity.as_bytes())),
            })
            .await?;

        if reply.code != ReplyCode::AUTH_OK {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }
        Ok(())
    }

    /// Authenticates with the AUTH LOGIN challenge/response exchange.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the credentials.
    pub async fn auth_login(&mut self, username: &str, password: &str) -> Result<()> {
        let reply = self
            .command(&Command::Auth {
                mechanism: AuthMechanism::Login,
                initial_response: None,
            })
            .await?;
        if reply.code != ReplyCode::AUTH_CONTINUE {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }

        let reply = self
            .send_line(STANDARD.encode(username.as_bytes()).as_bytes())
            .await?;
        if reply.code != ReplyCode::AUTH_CONTINUE {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }

        let reply = self
            .send_line(STANDARD.encode(password.as_bytes()).as_bytes())
            .await?;
        if reply.code != ReplyCode::AUTH_OK {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }
        Ok(())
    }

    /// Starts a mail transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the envelope sender.
    pub async fn mail_from(&mut self, from: &str) -> Result<()> {
        let reply = self
            .command(&Command::MailFrom {
                from: from.to_string(),
            })
            .await?;
        if !reply.is_success() {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }
        Ok(())
    }

    /// Adds an envelope recipient.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the recipient.
    pub async fn rcpt_to(&mut self, to: &str) -> Result<()> {
        let reply = self
            .command(&Command::RcptTo { to: to.to_string() })
            .await?;
        if !reply.is_success() {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }
        Ok(())
    }

    /// Transmits the message through a DATA exchange.
    ///
    /// Lines beginning with a dot are stuffed per RFC 5321 §4.5.2 and the
    /// terminating `CRLF.CRLF` is appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the server refuses DATA or rejects the message.
    pub async fn data(&mut self, message: &[u8]) -> Result<()> {
        let reply = self.command(&Command::Data).await?;
        if reply.code != ReplyCode::START_DATA {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }

        let mut body = dot_stuff(message);
        if !body.ends_with(b"\r\n") {
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(b".\r\n");

        self.stream.write_all(&body).await?;
        self.stream.flush().await?;

        let reply = self.read_reply().await?;
        if !reply.is_success() {
            return Err(Error::smtp(reply.code.as_u16(), reply.message_text()));
        }
        Ok(())
    }

    /// Ends the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; a non-221 farewell is ignored.
    pub async fn quit(&mut self) -> Result<()> {
        let _ = self.command(&Command::Quit).await?;
        Ok(())
    }

    /// Sends a command and reads the reply.
    async fn command(&mut self, cmd: &Command) -> Result<Reply> {
        self.stream.write_all(&cmd.serialize()).await?;
        self.stream.flush().await?;
        self.read_reply().await
    }

    /// Sends a raw continuation line (AUTH LOGIN responses).
    async fn send_line(&mut self, line: &[u8]) -> Result<Reply> {
        self.stream.write_all(line).await?;
        self.stream.write_all(b"\r\n").await?;
        self.stream.flush().await?;
        self.read_reply().await
    }

    /// Reads one complete (possibly multi-line) reply.
    async fn read_reply(&mut self) -> Result<Reply> {
        let mut lines = Vec::new();

        loop {
            let mut line = String::new();
            let n = self.stream.read_line(&mut line).await?;
            if n == 0 {
                return Err(Error::Protocol("connection closed by server".into()));
            }

            let line = line.trim_end_matches(['\r', '\n']).to_string();
            let done = is_last_reply_line(&line);
            lines.push(line);
            if done {
                break;
            }
        }

        parse_reply(&lines)
    }
}

/// Duplicates leading dots so message lines can't terminate DATA early.
fn dot_stuff(message: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(message.len() + 16);
    let mut at_line_start = true;

    for &byte in message {
        if at_line_start && byte == b'.' {
            out.push(b'.');
        }
        out.push(byte);
        at_line_start = byte == b'\n';
    }

    out
}
