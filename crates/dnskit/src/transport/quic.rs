use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use dnskit_domain::DomainError;
use quinn::{ClientConfig, Endpoint};

use super::{DnsTransport, MAX_REPLY_SIZE};
use crate::codec::frame_with_length_prefix;

const DOQ_ALPN: &[u8] = b"doq";

fn client_endpoint() -> Result<&'static Endpoint, DomainError> {
    static ENDPOINT: OnceLock<Result<Endpoint, String>> = OnceLock::new();
    let result = ENDPOINT.get_or_init(|| build_client_endpoint().map_err(|e| e.to_string()));
    result.as_ref().map_err(|e| DomainError::ConnectionError(e.clone()))
}

fn build_client_endpoint() -> Result<Endpoint, Box<dyn std::error::Error>> {
    let mut roots = rustls::RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let mut crypto = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    crypto.alpn_protocols = vec![DOQ_ALPN.to_vec()];

    let client_config = ClientConfig::new(Arc::new(
        quinn::crypto::rustls::QuicClientConfig::try_from(crypto)?,
    ));

    let bind_addr: SocketAddr = "0.0.0.0:0".parse()?;
    let mut endpoint = Endpoint::client(bind_addr)?;
    endpoint.set_default_client_config(client_config);
    Ok(endpoint)
}

/// DNS-over-QUIC (spec §4.2): ALPN "doq" to port 853. On a new bidirectional stream,
/// send the length-prefixed message, read the length-prefixed reply, close the stream.
pub struct QuicTransport {
    server_addr: SocketAddr,
    server_name: String,
}

impl QuicTransport {
    pub fn new(server_addr: SocketAddr, server_name: String) -> Self {
        QuicTransport {
            server_addr,
            server_name,
        }
    }
}

#[async_trait]
impl DnsTransport for QuicTransport {
    async fn send(&self, message: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError> {
        let deadline = tokio::time::Instant::now() + timeout;
        tokio::time::timeout_at(deadline, self.send_inner(message))
            .await
            .map_err(|_| DomainError::TimedOut)?
    }

    fn name(&self) -> &'static str {
        "QUIC"
    }
}

impl QuicTransport {
    async fn send_inner(&self, message: &[u8]) -> Result<Vec<u8>, DomainError> {
        let endpoint = client_endpoint()?;
        let connection = endpoint
            .connect(self.server_addr, &self.server_name)
            .map_err(|e| DomainError::ConnectionError(e.to_string()))?
            .await
            .map_err(|e| DomainError::ConnectionError(e.to_string()))?;

        let (mut send, mut recv) = connection
            .open_bi()
            .await
            .map_err(|e| DomainError::ConnectionError(e.to_string()))?;

        let framed = frame_with_length_prefix(message);
        send.write_all(&framed)
            .await
            .map_err(|e| DomainError::ConnectionError(e.to_string()))?;
        send.finish().map_err(|e| DomainError::ConnectionError(e.to_string()))?;

        let mut len_buf = [0u8; 2];
        recv.read_exact(&mut len_buf)
            .await
            .map_err(|e| DomainError::ConnectionError(e.to_string()))?;
        let len = u16::from_be_bytes(len_buf) as usize;
        if len == 0 {
            return Err(DomainError::EmptyResponse);
        }
        if len > MAX_REPLY_SIZE {
            return Err(DomainError::ExcessiveResponseSize);
        }

        let mut body = vec![0u8; len];
        recv.read_exact(&mut body)
            .await
            .map_err(|e| DomainError::ConnectionError(e.to_string()))?;

        connection.close(0u32.into(), b"done");
        Ok(body)
    }
}
