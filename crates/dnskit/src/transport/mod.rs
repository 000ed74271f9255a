pub mod https;
pub mod quic;
pub mod tcp;
pub mod tls;
pub mod udp;

use std::time::Duration;

use async_trait::async_trait;
use dnskit_domain::DomainError;

/// Maximum accepted reply size across every transport (spec §4.2).
pub const MAX_REPLY_SIZE: usize = 4096;

/// Shared contract for every wire transport (spec §4.2): given an already-encoded
/// message and a wall-clock timeout covering connect + send + receive, return the raw
/// reply bytes or a typed error. Implementations MUST cancel in-flight I/O once the
/// deadline elapses rather than leaving it to complete in the background.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(&self, message: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError>;

    fn name(&self) -> &'static str;
}

/// Enum-dispatched transport client, avoiding a `Box<dyn DnsTransport>` vtable for the
/// common path (mirrors the static-dispatch pattern the teacher crate used for its
/// transport enum).
pub enum TransportClient {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
    #[cfg(feature = "dns-over-tls")]
    Tls(tls::TlsTransport),
    #[cfg(feature = "dns-over-https")]
    Https(https::HttpsTransport),
    #[cfg(feature = "dns-over-quic")]
    Quic(quic::QuicTransport),
}

#[async_trait]
impl DnsTransport for TransportClient {
    async fn send(&self, message: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError> {
        match self {
            TransportClient::Udp(t) => t.send(message, timeout).await,
            TransportClient::Tcp(t) => t.send(message, timeout).await,
            #[cfg(feature = "dns-over-tls")]
            TransportClient::Tls(t) => t.send(message, timeout).await,
            #[cfg(feature = "dns-over-https")]
            TransportClient::Https(t) => t.send(message, timeout).await,
            #[cfg(feature = "dns-over-quic")]
            TransportClient::Quic(t) => t.send(message, timeout).await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            TransportClient::Udp(t) => t.name(),
            TransportClient::Tcp(t) => t.name(),
            #[cfg(feature = "dns-over-tls")]
            TransportClient::Tls(t) => t.name(),
            #[cfg(feature = "dns-over-https")]
            TransportClient::Https(t) => t.name(),
            #[cfg(feature = "dns-over-quic")]
            TransportClient::Quic(t) => t.name(),
        }
    }
}

/// Validates that `server_address` is well-formed for `transport` without attempting a
/// connection (spec §6 `validateConfiguration`).
pub fn validate_configuration(
    transport: dnskit_domain::Transport,
    server_address: &str,
) -> Option<DomainError> {
    dnskit_domain::parse_server_address(transport, server_address).err()
}
