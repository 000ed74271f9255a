use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use dnskit_domain::DomainError;
use tokio::net::UdpSocket;
use tracing::debug;

use super::{DnsTransport, MAX_REPLY_SIZE};
use crate::support::sockaddr::wildcard_bind_addr;

/// Plain DNS over UDP (spec §4.2): one datagram out, one datagram in.
pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        UdpTransport { server_addr }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(&self, message: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError> {
        let deadline = tokio::time::Instant::now() + timeout;
        tokio::time::timeout_at(deadline, self.send_inner(message))
            .await
            .map_err(|_| DomainError::TimedOut)?
    }

    fn name(&self) -> &'static str {
        "UDP"
    }
}

impl UdpTransport {
    async fn send_inner(&self, message: &[u8]) -> Result<Vec<u8>, DomainError> {
        let socket = UdpSocket::bind(wildcard_bind_addr(self.server_addr))
            .await
            .map_err(|e| DomainError::ConnectionError(e.to_string()))?;

        socket
            .send_to(message, self.server_addr)
            .await
            .map_err(|e| DomainError::ConnectionError(e.to_string()))?;

        let mut buf = vec![0u8; MAX_REPLY_SIZE];
        let (len, from) = socket
            .recv_from(&mut buf)
            .await
            .map_err(|e| DomainError::ConnectionError(e.to_string()))?;

        if from.ip() != self.server_addr.ip() {
            debug!(expected = %self.server_addr, received_from = %from, "UDP reply from unexpected source");
        }

        buf.truncate(len);
        if buf.is_empty() {
            return Err(DomainError::EmptyResponse);
        }
        Ok(buf)
    }
}
