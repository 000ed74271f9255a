use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Which wire transport a `Query` should use (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transport {
    Dns,
    Tls,
    Https,
    Quic,
    /// Delegates to whatever platform resolver facility is available; the core defines
    /// only the interface, not its wire behavior (spec §6, "system resolver").
    System,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Transport::Dns => "dns",
            Transport::Tls => "tls",
            Transport::Https => "https",
            Transport::Quic => "quic",
            Transport::System => "system",
        };
        write!(f, "{s}")
    }
}

/// Per-transport configuration (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportOptions {
    /// Plain DNS prefers TCP over UDP when both are available.
    pub dns_prefers_tcp: bool,
    pub timeout_seconds: u8,
    /// HTTPS only; defaults to the dnskit project identifier when unset.
    pub user_agent: Option<String>,
    pub https_bootstrap_ips: Option<Vec<SocketAddr>>,
    pub use_http2: bool,
}

impl TransportOptions {
    pub const DEFAULT_USER_AGENT: &'static str =
        concat!("dnskit/", env!("CARGO_PKG_VERSION"), " (github.com/dns-inspector/dnskit)");
}

impl Default for TransportOptions {
    fn default() -> Self {
        TransportOptions {
            dns_prefers_tcp: true,
            timeout_seconds: 5,
            user_agent: None,
            https_bootstrap_ips: None,
            use_http2: false,
        }
    }
}

/// Per-query configuration (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryOptions {
    pub dnssec_requested: bool,
}

/// A parsed server address, transport-dependent (spec §6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerAddress {
    /// `a.b.c.d[:port]`, `[v6]:port`, or a bare v6 literal; used by DNS/TLS/QUIC.
    Socket(SocketAddr),
    /// `https://host[:port]/path`, no query string; used by HTTPS.
    Url(String),
}

/// Default plaintext/TLS/QUIC ports when the caller omits one.
pub const DEFAULT_DNS_PORT: u16 = 53;
pub const DEFAULT_TLS_PORT: u16 = 853;
pub const DEFAULT_QUIC_PORT: u16 = 853;

/// Parses a server address string for `transport` per the syntax in spec §6.
pub fn parse_server_address(transport: Transport, raw: &str) -> Result<ServerAddress, DomainError> {
    match transport {
        Transport::Https => {
            let lower = raw.to_ascii_lowercase();
            if !lower.starts_with("https://") {
                return Err(DomainError::InvalidUrl);
            }
            if raw.contains('?') {
                return Err(DomainError::InvalidUrl);
            }
            Ok(ServerAddress::Url(raw.to_string()))
        }
        Transport::Dns | Transport::Tls | Transport::Quic | Transport::System => {
            let default_port = match transport {
                Transport::Tls | Transport::Quic => DEFAULT_TLS_PORT,
                _ => DEFAULT_DNS_PORT,
            };
            parse_socket_with_default_port(raw, default_port)
                .map(ServerAddress::Socket)
                .ok_or_else(|| DomainError::InvalidData(format!("invalid server address: {raw}")))
        }
    }
}

fn parse_socket_with_default_port(raw: &str, default_port: u16) -> Option<SocketAddr> {
    if let Ok(addr) = SocketAddr::from_str(raw) {
        return Some(addr);
    }
    if raw.starts_with('[') {
        if let Some(end) = raw.find(']') {
            let host = &raw[1..end];
            let ip = Ipv6Addr::from_str(host).ok()?;
            let rest = &raw[end + 1..];
            let port = if let Some(port_str) = rest.strip_prefix(':') {
                port_str.parse().ok()?
            } else {
                default_port
            };
            return Some(SocketAddr::new(IpAddr::V6(ip), port));
        }
        return None;
    }
    if let Ok(ip) = Ipv6Addr::from_str(raw) {
        return Some(SocketAddr::new(IpAddr::V6(ip), default_port));
    }
    if let Some((host, port_str)) = raw.rsplit_once(':') {
        if let (Ok(ip), Ok(port)) = (Ipv4Addr::from_str(host), port_str.parse::<u16>()) {
            return Some(SocketAddr::new(IpAddr::V4(ip), port));
        }
    }
    if let Ok(ip) = Ipv4Addr::from_str(raw) {
        return Some(SocketAddr::new(IpAddr::V4(ip), default_port));
    }
    None
}

/// Rewrites a reverse-lookup name for a PTR question (spec §3, tested in spec §8 scenario 2).
///
/// `8.8.4.4` becomes `4.4.8.8.in-addr.arpa.`; an IPv6 literal becomes its nibble-reversed
/// `ip6.arpa.` form. Any other input is returned unchanged, so a caller doing an ordinary
/// forward lookup never has its name mangled.
pub fn rewrite_for_ptr(name: &str) -> String {
    if let Ok(ip) = name.parse::<Ipv4Addr>() {
        let octets = ip.octets();
        return format!(
            "{}.{}.{}.{}.in-addr.arpa.",
            octets[3], octets[2], octets[1], octets[0]
        );
    }
    if let Ok(ip) = name.parse::<Ipv6Addr>() {
        let segments = ip.segments();
        let mut nibbles = Vec::with_capacity(32);
        for segment in segments {
            for shift in [12, 8, 4, 0] {
                nibbles.push(format!("{:x}", (segment >> shift) & 0xf));
            }
        }
        nibbles.reverse();
        return format!("{}.ip6.arpa.", nibbles.join("."));
    }
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_ipv4_ptr_name() {
        assert_eq!(rewrite_for_ptr("8.8.4.4"), "4.4.8.8.in-addr.arpa.");
    }

    #[test]
    fn rewrites_ipv6_ptr_name() {
        assert_eq!(
            rewrite_for_ptr("2001:db8::567:89ab"),
            "b.a.9.8.7.6.5.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.8.b.d.0.1.0.0.2.ip6.arpa."
        );
    }

    #[test]
    fn leaves_forward_name_untouched() {
        assert_eq!(rewrite_for_ptr("example.com."), "example.com.");
    }

    #[test]
    fn parses_bracketed_v6_with_port() {
        let addr = parse_server_address(Transport::Dns, "[2606:4700:4700::1111]:53").unwrap();
        assert_eq!(
            addr,
            ServerAddress::Socket(SocketAddr::new(
                IpAddr::V6("2606:4700:4700::1111".parse().unwrap()),
                53
            ))
        );
    }

    #[test]
    fn parses_bare_v4_with_default_port() {
        let addr = parse_server_address(Transport::Dns, "1.1.1.1").unwrap();
        assert_eq!(
            addr,
            ServerAddress::Socket(SocketAddr::new(IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)), 53))
        );
    }

    #[test]
    fn rejects_https_url_with_query_string() {
        let result = parse_server_address(Transport::Https, "https://dns.google/dns-query?x=1");
        assert!(matches!(result, Err(DomainError::InvalidUrl)));
    }

    #[test]
    fn rejects_non_https_scheme() {
        let result = parse_server_address(Transport::Https, "http://dns.google/dns-query");
        assert!(matches!(result, Err(DomainError::InvalidUrl)));
    }
}
