//! TCP and TLS stream setup.

use crate::error::{Error, Result};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;

/// Connects to an SMTP server over plain TCP.
///
/// # Errors
///
/// Returns an error if the connection fails.
pub async fn connect(hostname: &str, port: u16) -> Result<TcpStream> {
    let addr = format!("{hostname}:{port}");
    Ok(TcpStream::connect(&addr).await?)
}

/// Connects to an SMTP server over implicit TLS (typically port 465).
///
/// # Errors
///
/// Returns an error if the connection or TLS handshake fails.
pub async fn connect_tls(hostname: &str, port: u16) -> Result<TlsStream<TcpStream>> {
    let stream = connect(hostname, port).await?;
    upgrade(stream, hostname).await
}

/// Wraps an established stream in TLS (the STARTTLS upgrade path).
///
/// # Errors
///
/// Returns an error if the hostname is invalid or the handshake fails.
pub async fn upgrade<S>(stream: S, hostname: &str) -> Result<TlsStream<S>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let server_name = ServerName::try_from(hostname.to_string())
        .map_err(|_| Error::Protocol(format!("invalid hostname: {hostname}")))?;

    Ok(tls_connector().connect(server_name, stream).await?)
}

/// Creates a TLS connector with the webpki root certificates.
fn tls_connector() -> TlsConnector {
    let root_store = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    TlsConnector::from(Arc::new(config))
}
