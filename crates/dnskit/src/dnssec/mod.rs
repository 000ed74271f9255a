//! The DNSSEC authenticator (spec §4.4): collects DNSKEY/DS resources for every zone
//! on the path from a reply's signer name to the root, verifies RRSIG signatures over
//! canonical resource-record sets, and walks delegation-signer records to confirm
//! trust from the pinned root anchors.

pub mod chain;
pub mod crypto;
pub mod signing;
pub mod trust_anchor;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use dnskit_domain::{
    Answer, DNSSECResource, DNSSECResult, DnssecError, DomainError, Message, QueryOptions,
    RecordData, RecordType, ResponseCode,
};

use crate::codec::{decode_message, encode_query};
use crate::transport::{DnsTransport, TransportClient};

/// Total wall-clock budget for the resource-collection phase (spec §4.4, §5: "a shared
/// deadline (default 10 s total)"). Its expiry is the one DNSSEC failure mode that
/// propagates as an `Err` rather than being recorded inside `DNSSECResult` (spec §7).
const RESOURCE_COLLECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-fetch timeout handed to the transport client for each (zone, record-type) task.
const PER_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs full DNSSEC authentication of `reply` (the answer to a question about `name`)
/// over `client`, the transport that produced it (spec §6 `Query.authenticate`).
///
/// Signature verification and chain-of-trust verification are independent: both are
/// always attempted, and a partial result — signature verified but chain untrusted, or
/// vice versa — is a meaningful final outcome, not an error (spec §4.4 "Result shape").
pub async fn authenticate(client: Arc<TransportClient>, name: &str, reply: &Message) -> Result<DNSSECResult, DomainError> {
    let mut result = DNSSECResult::new();

    let rrsigs: Vec<&Answer> = reply.answers.iter().filter(|a| matches!(a.data, RecordData::Rrsig(_))).collect();
    if rrsigs.is_empty() {
        result.signature_error = Some(DnssecError::NoSignatures);
        result.chain_error = Some(DnssecError::NoSignatures);
        return Ok(result);
    }

    let zones = collect_zone_chain(&rrsigs);

    let resources = match tokio::time::timeout(RESOURCE_COLLECTION_TIMEOUT, collect_resources(Arc::clone(&client), &zones)).await {
        Ok(Ok(resources)) => resources,
        Ok(Err(dnssec_err)) => {
            result.signature_error = Some(dnssec_err.clone());
            result.chain_error = Some(dnssec_err);
            return Ok(result);
        }
        Err(_elapsed) => return Err(DomainError::TimedOut),
    };

    result.resources = zones.iter().filter_map(|z| resources.get(z).cloned()).collect();

    match verify_reply_signature(reply, &rrsigs, &resources) {
        Ok(()) => result.signature_verified = true,
        Err(err) => result.signature_error = Some(err),
    }

    // Early termination (spec §4.4): a root-zone question has no chain to walk.
    if name == "." {
        result.chain_trusted = result.signature_verified;
    } else {
        match chain::verify_chain(&zones, &resources) {
            Ok(()) => result.chain_trusted = true,
            Err(err) => result.chain_error = Some(err),
        }
    }

    Ok(result)
}

/// Verifies every RRSIG in the reply against the rrset it covers. All RRSIGs present
/// must verify for the reply as a whole to be considered signature-verified; the first
/// failure encountered is reported.
fn verify_reply_signature(reply: &Message, rrsigs: &[&Answer], resources: &HashMap<String, DNSSECResource>) -> Result<(), DnssecError> {
    for rrsig_answer in rrsigs {
        let RecordData::Rrsig(rrsig) = &rrsig_answer.data else {
            continue;
        };
        let rrset: Vec<&Answer> = reply
            .answers
            .iter()
            .filter(|a| !matches!(a.data, RecordData::Rrsig(_)))
            .filter(|a| a.record_type.to_u16() == rrsig.type_covered.to_u16() && a.name.eq_ignore_ascii_case(&rrsig_answer.name))
            .collect();
        if rrset.is_empty() {
            return Err(DnssecError::InvalidResponse("no answers matched the RRSIG's covered type/owner".to_string()));
        }

        let zone = resources
            .get(&rrsig.signer_name.to_ascii_lowercase())
            .ok_or_else(|| DnssecError::MissingKeys(rrsig.signer_name.clone()))?;

        signing::verify_rrset(&rrset, rrsig_answer, rrsig, &zone.dnskeys)?;
    }
    Ok(())
}

/// Computes the ancestor chain of a signer name up to and including the root (spec
/// §4.4 "Resource collection"): `example.com.` → `["example.com.", "com.", "."]`. Names
/// are lowercased so they double as the `resources` map's canonical keys.
fn zone_chain(signer_name: &str) -> Vec<String> {
    let lower = signer_name.to_ascii_lowercase();
    let trimmed = lower.trim_end_matches('.');
    if trimmed.is_empty() {
        return vec![".".to_string()];
    }
    let labels: Vec<&str> = trimmed.split('.').collect();
    let mut zones: Vec<String> = (0..labels.len()).map(|i| format!("{}.", labels[i..].join("."))).collect();
    zones.push(".".to_string());
    zones
}

/// Unions the ancestor chains of every RRSIG's signer name in the reply, deduplicated,
/// always including the root.
fn collect_zone_chain(rrsigs: &[&Answer]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for rrsig_answer in rrsigs {
        if let RecordData::Rrsig(rrsig) = &rrsig_answer.data {
            for zone in zone_chain(&rrsig.signer_name) {
                if seen.insert(zone.clone()) {
                    ordered.push(zone);
                }
            }
        }
    }
    if seen.insert(".".to_string()) {
        ordered.push(".".to_string());
    }
    ordered
}

/// Fans out one task per (zone, record-type) fetch (spec §5 "Concurrency model"),
/// joins them, and assembles the per-zone `DNSSECResource` map. A reply that fails
/// NOERROR or lacks the requested record type plus an RRSIG raises `missingKeys`
/// (spec §4.4 "Resource collection").
async fn collect_resources(client: Arc<TransportClient>, zones: &[String]) -> Result<HashMap<String, DNSSECResource>, DnssecError> {
    let mut handles = Vec::with_capacity(zones.len() * 2);
    for zone in zones {
        handles.push(tokio::spawn(fetch(Arc::clone(&client), RecordType::DNSKEY, zone.clone())));
        if zone != "." {
            handles.push(tokio::spawn(fetch(Arc::clone(&client), RecordType::DS, zone.clone())));
        }
    }

    let mut resources: HashMap<String, DNSSECResource> = zones.iter().map(|z| (z.clone(), DNSSECResource::new(z.clone()))).collect();

    for handle in handles {
        let (zone, record_type, reply) = handle
            .await
            .map_err(|e| DnssecError::InternalError(format!("resource-fetch task panicked: {e}")))?;
        let message = reply.map_err(|e| DnssecError::MissingKeys(format!("{zone} {record_type}: {e}")))?;

        if message.response_code() != ResponseCode::NoError {
            return Err(DnssecError::MissingKeys(format!("{zone} {record_type}: non-NOERROR response")));
        }

        let matching: Vec<Answer> = message
            .answers
            .iter()
            .filter(|a| a.record_type.to_u16() == record_type.to_u16())
            .cloned()
            .collect();
        let rrsig = message.answers.iter().find(|a| matches!(a.data, RecordData::Rrsig(_))).cloned();
        if matching.is_empty() || rrsig.is_none() {
            return Err(DnssecError::MissingKeys(format!("{zone} {record_type}: missing records or covering RRSIG")));
        }

        let resource = resources.entry(zone.clone()).or_insert_with(|| DNSSECResource::new(zone.clone()));
        match record_type {
            RecordType::DNSKEY => {
                resource.dnskeys = matching;
                resource.dnskey_rrsig = rrsig;
            }
            RecordType::DS => {
                resource.ds_records = matching;
                resource.ds_rrsig = rrsig;
            }
            _ => unreachable!("only DNSKEY and DS fetches are ever spawned"),
        }
    }

    Ok(resources)
}

async fn fetch(client: Arc<TransportClient>, record_type: RecordType, zone: String) -> (String, RecordType, Result<Message, DomainError>) {
    let result = fetch_inner(client, record_type, &zone).await;
    (zone, record_type, result)
}

async fn fetch_inner(client: Arc<TransportClient>, record_type: RecordType, zone: &str) -> Result<Message, DomainError> {
    let question = dnskit_domain::Question::new(zone.to_string(), record_type);
    let id = fastrand::u16(..);
    let encoded = encode_query(id, &question, QueryOptions { dnssec_requested: true })?;
    let bytes = client.send(&encoded, PER_FETCH_TIMEOUT).await?;
    decode_message(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_chain_includes_every_ancestor_and_root() {
        assert_eq!(zone_chain("example.com."), vec!["example.com.", "com.", "."]);
    }

    #[test]
    fn zone_chain_of_root_is_just_root() {
        assert_eq!(zone_chain("."), vec!["."]);
    }

    #[test]
    fn zone_chain_lowercases_labels() {
        assert_eq!(zone_chain("Example.COM."), vec!["example.com.", "com.", "."]);
    }
}
