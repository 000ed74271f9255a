use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use dnskit_domain::DomainError;
use rustls::pki_types::ServerName;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

use super::tcp::read_framed_reply;
use super::DnsTransport;
use crate::codec::frame_with_length_prefix;

fn root_cert_store() -> &'static Arc<rustls::RootCertStore> {
    static STORE: OnceLock<Arc<rustls::RootCertStore>> = OnceLock::new();
    STORE.get_or_init(|| {
        let mut store = rustls::RootCertStore::empty();
        store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        Arc::new(store)
    })
}

fn client_config() -> Arc<rustls::ClientConfig> {
    Arc::new(
        rustls::ClientConfig::builder()
            .with_root_certificates(root_cert_store().clone())
            .with_no_client_auth(),
    )
}

/// DNS-over-TLS (spec §4.2): identical 2-byte length-prefixed framing to plain DNS/TCP,
/// but on port 853 over TLS 1.2+ with the server certificate validated against system
/// trust (here, the Mozilla root set bundled via `webpki-roots`).
pub struct TlsTransport {
    server_addr: SocketAddr,
    server_name: String,
}

impl TlsTransport {
    /// `server_name` is the hostname used for SNI and certificate validation: the
    /// server's configured DNS name if one was supplied, otherwise its address.
    pub fn new(server_addr: SocketAddr, server_name: String) -> Self {
        TlsTransport {
            server_addr,
            server_name,
        }
    }
}

#[async_trait]
impl DnsTransport for TlsTransport {
    async fn send(&self, message: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError> {
        let deadline = tokio::time::Instant::now() + timeout;
        tokio::time::timeout_at(deadline, self.send_inner(message))
            .await
            .map_err(|_| DomainError::TimedOut)?
    }

    fn name(&self) -> &'static str {
        "TLS"
    }
}

impl TlsTransport {
    async fn send_inner(&self, message: &[u8]) -> Result<Vec<u8>, DomainError> {
        let tcp = TcpStream::connect(self.server_addr)
            .await
            .map_err(|e| DomainError::ConnectionError(e.to_string()))?;

        let connector = TlsConnector::from(client_config());
        let server_name = ServerName::try_from(self.server_name.clone())
            .map_err(|_| DomainError::InvalidData(format!("invalid TLS server name: {}", self.server_name)))?;

        let mut stream = connector
            .connect(server_name, tcp)
            .await
            .map_err(|e| DomainError::ConnectionError(e.to_string()))?;

        let framed = frame_with_length_prefix(message);
        stream
            .write_all(&framed)
            .await
            .map_err(|e| DomainError::ConnectionError(e.to_string()))?;

        read_framed_reply(&mut stream).await
    }
}
