//! End-to-end scenarios against real public resolvers. Network-dependent, so these are
//! `#[ignore]`d by default; run with `cargo test -- --ignored` when a network is
//! available.

use dnskit::dispatcher::Query;
use dnskit_domain::{QueryOptions, RecordData, RecordType, ResponseCode, Transport, TransportOptions};

/// Installs a test-scoped subscriber so `tracing::debug!` query-attempt diagnostics
/// show up under `cargo test -- --ignored --nocapture` instead of going nowhere; a
/// real embedding application installs its own subscriber in `main`, not this crate.
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[tokio::test]
#[ignore = "requires network access to 1.1.1.1:53"]
async fn a_record_lookup_over_plain_dns() {
    init_tracing();
    let query = Query::new(
        Transport::Dns,
        TransportOptions::default(),
        &["1.1.1.1:53".to_string()],
        RecordType::A,
        "example.com",
        QueryOptions::default(),
    )
    .unwrap();

    let reply = query.execute().await.unwrap();
    assert_eq!(reply.response_code(), ResponseCode::NoError);
    let has_a_record = reply
        .answers
        .iter()
        .any(|a| matches!(a.data, RecordData::A(_)));
    assert!(has_a_record, "expected at least one A answer");
}

#[tokio::test]
#[ignore = "requires network access to a public recursive resolver"]
async fn nxdomain_propagates_as_a_response_code_not_an_error() {
    init_tracing();
    let query = Query::new(
        Transport::Dns,
        TransportOptions::default(),
        &["1.1.1.1:53".to_string()],
        RecordType::A,
        "if-you-register-this-domain-im-going-to-be-very-angry.com",
        QueryOptions::default(),
    )
    .unwrap();

    let reply = query.execute().await.unwrap();
    assert_eq!(reply.response_code(), ResponseCode::NameError);
}

#[tokio::test]
#[ignore = "requires network access to 1.1.1.1:53"]
async fn dnssec_positive_path_for_example_com() {
    init_tracing();
    let options = QueryOptions { dnssec_requested: true };
    let query = Query::new(
        Transport::Dns,
        TransportOptions::default(),
        &["1.1.1.1:53".to_string()],
        RecordType::A,
        "example.com",
        options,
    )
    .unwrap();

    let reply = query.execute().await.unwrap();
    let result = query.authenticate(&reply).await.unwrap();

    assert!(result.signature_verified);
    assert!(result.chain_trusted);
    let zone_names: Vec<&str> = result.resources.iter().map(|r| r.zone_name.as_str()).collect();
    assert!(zone_names.contains(&"example.com."));
    assert!(zone_names.contains(&"com."));
    assert!(zone_names.contains(&"."));
}
