//! SMTP command serialization.

/// Authentication mechanisms this client speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMechanism {
    /// AUTH PLAIN (RFC 4616).
    Plain,
    /// AUTH LOGIN (legacy challenge/response).
    Login,
}

impl AuthMechanism {
    /// Protocol name of the mechanism.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "PLAIN",
            Self::Login => "LOGIN",
        }
    }
}

/// SMTP command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// EHLO - extended greeting.
    Ehlo {
        /// Client hostname.
        hostname: String,
    },
    /// STARTTLS - upgrade to TLS.
    StartTls,
    /// AUTH - begin authentication.
    Auth {
        /// Authentication mechanism.
        mechanism: AuthMechanism,
        /// Initial response (SASL-IR).
        initial_response: Option<String>,
    },
    /// MAIL FROM - start mail transaction.
    MailFrom {
        /// Envelope sender address.
        from: String,
    },
    /// RCPT TO - add envelope recipient.
    RcptTo {
        /// Envelope recipient address.
        to: String,
    },
    /// DATA - begin message data.
    Data,
    /// QUIT - close connection.
    Quit,
}

impl Command {
    /// Serializes the command as a CRLF-terminated line.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let line = match self {
            Self::Ehlo { hostname } => format!("EHLO {hostname}"),
            Self::StartTls => "STARTTLS".to_string(),
            Self::Auth {
                mechanism,
                initial_response,
            } => match initial_response {
                Some(resp) => format!("AUTH {} {resp}", mechanism.as_str()),
                None => format!("AUTH {}", mechanism.as_str()),
            },
            Self::MailFrom { from } => format!("MAIL FROM:<{from}>"),
            Self::RcptTo { to } => format!("RCPT TO:<{to}>"),
            Self::Data => "DATA".to_string(),
            Self::Quit => "QUIT".to_string(),
        };

        let mut buf = line.into_bytes();
        buf.extend_from_slice(b"\r\n");
        buf
    }
}
