use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dnskit_domain::{
    parse_server_address, rewrite_for_ptr, DomainError, Message, QueryOptions, RecordType,
    ServerAddress, Transport, TransportOptions,
};
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tracing::debug;

use crate::codec::{decode_message, encode_query};
use crate::support::AtomicOnce;
use crate::transport::{DnsTransport, TransportClient};
use crate::transport::{https::HttpsTransport, quic::QuicTransport, tcp::TcpTransport, tls::TlsTransport, udp::UdpTransport};

/// Maximum number of server addresses a single query may race (spec §4.3).
pub const MAX_SERVER_ADDRESSES: usize = 10;

/// Combines a question with transport configuration and drives it across one or more
/// transport clients (spec §4.3, §6 `Query.new`/`execute`/`authenticate`).
pub struct Query {
    transport: Transport,
    options: TransportOptions,
    query_options: QueryOptions,
    clients: Vec<Arc<TransportClient>>,
    encoded: Vec<u8>,
    name: String,
    /// Set once `execute` succeeds, so a later `authenticate` call on the same `Query`
    /// reuses the winning client rather than re-racing every address (spec §4.3).
    winner: AtomicOnce<Arc<TransportClient>>,
}

impl Query {
    pub fn new(
        transport: Transport,
        options: TransportOptions,
        server_addresses: &[String],
        record_type: RecordType,
        name: &str,
        query_options: QueryOptions,
    ) -> Result<Self, DomainError> {
        if server_addresses.is_empty() {
            return Err(DomainError::InvalidData("no server addresses supplied".to_string()));
        }
        if server_addresses.len() > MAX_SERVER_ADDRESSES {
            return Err(DomainError::InvalidData(format!(
                "too many server addresses: {} > {MAX_SERVER_ADDRESSES}",
                server_addresses.len()
            )));
        }

        let rewritten_name = if record_type == RecordType::PTR {
            rewrite_for_ptr(name)
        } else {
            name.to_string()
        };
        let question = dnskit_domain::Question::new(rewritten_name.clone(), record_type);
        let id = fastrand::u16(..);
        let encoded = encode_query(id, &question, query_options)?;

        let clients = server_addresses
            .iter()
            .map(|addr| build_client(transport, &options, addr))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(Arc::new)
            .collect();

        Ok(Query {
            transport,
            options,
            query_options,
            clients,
            encoded,
            name: rewritten_name,
            winner: AtomicOnce::new(),
        })
    }

    /// Races all configured clients concurrently and returns the first successful
    /// reply; if none succeed, returns the first error received (spec §4.3).
    pub async fn execute(&self) -> Result<Message, DomainError> {
        if let Some(winner) = self.winner.get() {
            return self.send_via(&winner).await;
        }

        let timeout = Duration::from_secs(self.options.timeout_seconds as u64);
        let mut pending = FuturesUnordered::new();
        for client in &self.clients {
            let client = Arc::clone(client);
            let encoded = self.encoded.clone();
            pending.push(async move {
                let result = client.send(&encoded, timeout).await;
                (client, result)
            });
        }

        let mut first_error = None;
        while let Some((client, result)) = pending.next().await {
            match result {
                Ok(bytes) => match decode_message(&bytes) {
                    Ok(message) => {
                        self.winner.set(client);
                        return Ok(message);
                    }
                    Err(err) => {
                        debug!(transport = ?self.transport, error = %err, "reply failed to decode");
                        if first_error.is_none() {
                            first_error = Some(err);
                        }
                    }
                },
                Err(err) => {
                    debug!(transport = ?self.transport, error = %err, "query attempt failed");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        Err(first_error.unwrap_or(DomainError::EmptyResponse))
    }

    /// Runs DNSSEC authentication over a reply previously obtained by `execute`,
    /// reusing the winning client for side queries (spec §4.3/§4.4).
    pub async fn authenticate(&self, reply: &Message) -> Result<dnskit_domain::DNSSECResult, DomainError> {
        let client = match self.winner.get() {
            Some(client) => client,
            None => {
                self.execute().await?;
                self.winner
                    .get()
                    .expect("execute() sets winner on success")
            }
        };
        crate::dnssec::authenticate(client, &self.name, reply).await
    }

    async fn send_via(&self, client: &TransportClient) -> Result<Message, DomainError> {
        let timeout = Duration::from_secs(self.options.timeout_seconds as u64);
        let bytes = client.send(&self.encoded, timeout).await?;
        decode_message(&bytes)
    }
}

pub(crate) fn build_client(transport: Transport, options: &TransportOptions, raw_address: &str) -> Result<TransportClient, DomainError> {
    let parsed = parse_server_address(transport, raw_address)?;
    match (transport, parsed) {
        (Transport::Dns, ServerAddress::Socket(addr)) => {
            if options.dns_prefers_tcp {
                Ok(TransportClient::Tcp(TcpTransport::new(addr)))
            } else {
                Ok(TransportClient::Udp(UdpTransport::new(addr)))
            }
        }
        #[cfg(feature = "dns-over-tls")]
        (Transport::Tls, ServerAddress::Socket(addr)) => {
            Ok(TransportClient::Tls(TlsTransport::new(addr, addr.ip().to_string())))
        }
        #[cfg(not(feature = "dns-over-tls"))]
        (Transport::Tls, ServerAddress::Socket(_)) => Err(DomainError::InvalidData(
            "dns-over-tls feature not enabled".to_string(),
        )),
        #[cfg(feature = "dns-over-quic")]
        (Transport::Quic, ServerAddress::Socket(addr)) => {
            Ok(TransportClient::Quic(QuicTransport::new(addr, addr.ip().to_string())))
        }
        #[cfg(not(feature = "dns-over-quic"))]
        (Transport::Quic, ServerAddress::Socket(_)) => Err(DomainError::InvalidData(
            "dns-over-quic feature not enabled".to_string(),
        )),
        #[cfg(feature = "dns-over-https")]
        (Transport::Https, ServerAddress::Url(url)) => {
            let bootstrap_ip = options
                .https_bootstrap_ips
                .as_ref()
                .and_then(|ips| ips.first())
                .copied();
            Ok(TransportClient::Https(HttpsTransport::new(
                url,
                options.user_agent.clone().or_else(|| Some(TransportOptions::DEFAULT_USER_AGENT.to_string())),
                options.use_http2,
                bootstrap_ip,
            )))
        }
        #[cfg(not(feature = "dns-over-https"))]
        (Transport::Https, ServerAddress::Url(_)) => Err(DomainError::InvalidData(
            "dns-over-https feature not enabled".to_string(),
        )),
        (Transport::System, _) => Err(DomainError::InvalidData(
            "system transport has no core wire implementation; bridge it externally".to_string(),
        )),
        _ => Err(DomainError::InvalidData("server address does not match transport".to_string())),
    }
}
