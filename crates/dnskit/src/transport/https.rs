use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use dnskit_domain::DomainError;
use tracing::debug;

use super::{DnsTransport, MAX_REPLY_SIZE};
use crate::codec::encode_dns_query_param;

const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

fn shared_client(use_http2: bool) -> &'static reqwest::Client {
    static HTTP1: OnceLock<reqwest::Client> = OnceLock::new();
    static HTTP2: OnceLock<reqwest::Client> = OnceLock::new();
    let cell = if use_http2 { &HTTP2 } else { &HTTP1 };
    cell.get_or_init(|| {
        let mut builder = reqwest::Client::builder();
        if use_http2 {
            builder = builder.http2_prior_knowledge();
        }
        builder.build().unwrap_or_else(|_| reqwest::Client::new())
    })
}

/// Builds a one-off client pinned to `bootstrap` for `host`, used when a caller
/// configures `httpsBootstrapIps` to bypass normal name resolution (spec §4.2/§6).
fn bootstrap_client(host: &str, bootstrap: std::net::SocketAddr, use_http2: bool) -> reqwest::Client {
    let mut builder = reqwest::Client::builder().resolve(host, bootstrap);
    if use_http2 {
        builder = builder.http2_prior_knowledge();
    }
    builder.build().unwrap_or_else(|_| reqwest::Client::new())
}

/// DNS-over-HTTPS (spec §4.2, RFC 8484 §4.1): a GET request with the base64url-encoded
/// message in the `dns=` query parameter, not a POST — the id is zeroed here before
/// encoding (RFC 8484 §4.1); the dispatcher's encoded bytes carry a random id shared
/// across every racing transport, so this transport is the one that rewrites it.
pub struct HttpsTransport {
    url: String,
    user_agent: Option<String>,
    use_http2: bool,
    bootstrap_ip: Option<std::net::SocketAddr>,
}

impl HttpsTransport {
    pub fn new(url: String, user_agent: Option<String>, use_http2: bool, bootstrap_ip: Option<std::net::SocketAddr>) -> Self {
        HttpsTransport {
            url,
            user_agent,
            use_http2,
            bootstrap_ip,
        }
    }
}

#[async_trait]
impl DnsTransport for HttpsTransport {
    async fn send(&self, message: &[u8], timeout: Duration) -> Result<Vec<u8>, DomainError> {
        let deadline = tokio::time::Instant::now() + timeout;
        tokio::time::timeout_at(deadline, self.send_inner(message))
            .await
            .map_err(|_| DomainError::TimedOut)?
    }

    fn name(&self) -> &'static str {
        "HTTPS"
    }
}

impl HttpsTransport {
    async fn send_inner(&self, message: &[u8]) -> Result<Vec<u8>, DomainError> {
        // RFC 8484 §4.1: the id SHOULD be 0 for a DoH GET, since the query parameter
        // itself ties the request to its response. The dispatcher stamps a random id
        // shared by every racing transport, so zero it out just for this one.
        let mut zeroed_id = message.to_vec();
        if zeroed_id.len() >= 2 {
            zeroed_id[0] = 0;
            zeroed_id[1] = 0;
        }
        let query_param = encode_dns_query_param(&zeroed_id);
        let url = format!("{}?dns={}", self.url, query_param);

        debug!(url = %self.url, message_len = message.len(), "sending DoH query");

        let client = match (self.bootstrap_ip, crate::support::sockaddr::https_host(&self.url)) {
            (Some(bootstrap), Some(host)) => bootstrap_client(host, bootstrap, self.use_http2),
            _ => shared_client(self.use_http2).clone(),
        };

        let mut request = client.get(&url).header("Accept", DNS_MESSAGE_CONTENT_TYPE);
        if let Some(user_agent) = &self.user_agent {
            request = request.header("User-Agent", user_agent.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if status.as_u16() != 200 {
            return Err(DomainError::HttpError(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();
        if !content_type.starts_with(DNS_MESSAGE_CONTENT_TYPE) {
            return Err(DomainError::InvalidContentType(content_type));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DomainError::ConnectionError(e.to_string()))?;

        if body.len() > MAX_REPLY_SIZE {
            return Err(DomainError::ExcessiveResponseSize);
        }
        if body.is_empty() {
            return Err(DomainError::EmptyResponse);
        }
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_get_url_with_dns_param() {
        let query_param = encode_dns_query_param(&[1, 2, 3]);
        let url = format!("https://dns.google/dns-query?dns={query_param}");
        assert!(url.contains("dns="));
        // exactly one query separator
        assert_eq!(url.matches('?').count(), 1);
    }
}
