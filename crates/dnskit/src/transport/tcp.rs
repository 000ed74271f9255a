use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use dnskit_domain::DomainError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use super::{DnsTransport, MAX_REPLY_SIZE};
use crate::codec::frame_with_length_prefix;

/// Plain DNS over TCP (spec §4.2): connect to port 53 (or a TLS-wrapped variant reuses
/// this framing on port 853), write a 2-byte length prefix then the message, read
/// exactly 2 bytes for the declared reply length, then that many bytes.
pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        TcpTransport { server_addr }
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(&self, message: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError> {
        let deadline = tokio::time::Instant::now() + timeout;
        tokio::time::timeout_at(deadline, self.send_inner(message))
            .await
            .map_err(|_| DomainError::TimedOut)?
    }

    fn name(&self) -> &'static str {
        "TCP"
    }
}

impl TcpTransport {
    async fn send_inner(&self, message: &[u8]) -> Result<Vec<u8>, DomainError> {
        let mut stream = TcpStream::connect(self.server_addr)
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

/// Shared by TCP and TLS: read a 2-byte length prefix, reject 0 or oversize, then read
/// exactly that many bytes (spec §4.2, "Failure scenarios").
pub(super) async fn read_framed_reply<R: AsyncReadExt + Unpin>(reader: &mut R) -> Result<Vec<u8>, DomainError> {
    let mut len_buf = [0u8; 2];
    reader
        .read_exact(&mut len_buf)
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
    reader
        .read_exact(&mut body)
        .await
        .map_err(|e| DomainError::ConnectionError(e.to_string()))?;
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn rejects_zero_length_as_empty_response() {
        let mut reader = Cursor::new(vec![0x00, 0x00]);
        let result = read_framed_reply(&mut reader).await;
        assert!(matches!(result, Err(DomainError::EmptyResponse)));
    }

    #[tokio::test]
    async fn rejects_oversize_length_field() {
        let mut reader = Cursor::new(8000u16.to_be_bytes().to_vec());
        let result = read_framed_reply(&mut reader).await;
        assert!(matches!(result, Err(DomainError::ExcessiveResponseSize)));
    }

    #[tokio::test]
    async fn reads_exact_declared_length() {
        let mut bytes = 4u16.to_be_bytes().to_vec();
        bytes.extend_from_slice(&[1, 2, 3, 4]);
        let mut reader = Cursor::new(bytes);
        let result = read_framed_reply(&mut reader).await.unwrap();
        assert_eq!(result, vec![1, 2, 3, 4]);
    }
}
