use std::net::SocketAddr;

/// Picks the wildcard bind address matching `target`'s address family, for transports
/// that need to bind an ephemeral local socket before connecting (spec §4.2 UDP/TCP).
pub fn wildcard_bind_addr(target: SocketAddr) -> SocketAddr {
    if target.is_ipv4() {
        "0.0.0.0:0".parse().expect("valid v4 wildcard")
    } else {
        "[::]:0".parse().expect("valid v6 wildcard")
    }
}

/// Extracts the bare host (no scheme, no port, no path) from an `https://` server
/// address, used to set the TLS server-name and HTTP `Host` header when a bootstrap IP
/// bypasses normal name resolution (spec §4.2 DNS-over-HTTPS).
pub fn https_host(url: &str) -> Option<&str> {
    let without_scheme = url.strip_prefix("https://")?;
    let end = without_scheme
        .find(['/', ':'])
        .unwrap_or(without_scheme.len());
    let host = &without_scheme[..end];
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_host_with_path() {
        assert_eq!(https_host("https://dns.google/dns-query"), Some("dns.google"));
    }

    #[test]
    fn extracts_host_with_port() {
        assert_eq!(https_host("https://dns.google:8443/dns-query"), Some("dns.google"));
    }

    #[test]
    fn wildcard_matches_family() {
        let v4: SocketAddr = "1.1.1.1:53".parse().unwrap();
        assert!(wildcard_bind_addr(v4).is_ipv4());
        let v6: SocketAddr = "[2606:4700:4700::1111]:53".parse().unwrap();
        assert!(wildcard_bind_addr(v6).is_ipv6());
    }
}
