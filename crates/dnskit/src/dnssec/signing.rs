//! Canonical RRSIG signed-data construction and the per-record validation checks that
//! must pass before any cryptography runs (spec §4.4 "Canonical signed-data
//! construction" and "Per-record validation checks before crypto").

use std::time::{SystemTime, UNIX_EPOCH};

use dnskit_domain::answer::RrsigData;
use dnskit_domain::{Answer, DnssecError, DomainError, RecordData};

use crate::codec::name::encode_name;
use crate::codec::rdata::dnskey_key_tag;

/// Wire-encodes `owner_name` in canonical (lowercased) form, applying RFC 4034 §3.1.3
/// wildcard canonicalization when the RRSIG's `label_count` is smaller than the
/// record's actual label count: the leading labels are replaced by a single `*` label.
fn canonical_owner_wire(owner_name: &str, label_count: u8) -> Result<Vec<u8>, DomainError> {
    let lowered = owner_name.to_ascii_lowercase();
    let trimmed = lowered.trim_end_matches('.');
    if trimmed.is_empty() {
        return encode_name(".");
    }
    let labels: Vec<&str> = trimmed.split('.').collect();
    let keep = label_count as usize;
    if labels.len() > keep {
        let suffix = &labels[labels.len() - keep..];
        let wildcard_name = if suffix.is_empty() {
            "*.".to_string()
        } else {
            format!("*.{}.", suffix.join("."))
        };
        encode_name(&wildcard_name)
    } else {
        encode_name(&lowered)
    }
}

/// Builds the canonical byte sequence an RRSIG signature is computed over (spec §4.4
/// step 1-3): the RRSIG's fixed fields (signature omitted) followed by every member of
/// `rrset`, sorted ascending by uncompressed rdata bytes.
pub fn build_signed_data(rrsig: &RrsigData, rrset: &[&Answer]) -> Result<Vec<u8>, DomainError> {
    let mut data = Vec::new();
    data.extend_from_slice(&rrsig.type_covered.to_u16().to_be_bytes());
    data.push(rrsig.algorithm);
    data.push(rrsig.label_count);
    data.extend_from_slice(&rrsig.original_ttl.to_be_bytes());
    data.extend_from_slice(&rrsig.signature_expiration.to_be_bytes());
    data.extend_from_slice(&rrsig.signature_inception.to_be_bytes());
    data.extend_from_slice(&rrsig.key_tag.to_be_bytes());
    data.extend_from_slice(&encode_name(&rrsig.signer_name.to_ascii_lowercase())?);

    let mut sorted: Vec<&Answer> = rrset.to_vec();
    sorted.sort_by(|a, b| a.uncompressed_rdata().cmp(b.uncompressed_rdata()));

    for record in sorted {
        data.extend_from_slice(&canonical_owner_wire(&record.name, rrsig.label_count)?);
        data.extend_from_slice(&record.record_type.to_u16().to_be_bytes());
        data.extend_from_slice(&record.class.to_be_bytes());
        data.extend_from_slice(&rrsig.original_ttl.to_be_bytes());
        data.extend_from_slice(&(record.uncompressed_rdata().len() as u16).to_be_bytes());
        data.extend_from_slice(record.uncompressed_rdata());
    }
    Ok(data)
}

/// Runs every check spec §4.4 requires before a signature is even attempted. Any
/// failure is `badSigningKey`; an empty rrset is `invalidResponse`.
pub fn validate_answers(
    rrset: &[&Answer],
    rrsig_answer: &Answer,
    rrsig: &RrsigData,
    dnskey_answer: &Answer,
) -> Result<(), DnssecError> {
    let first = match rrset.first() {
        Some(first) => *first,
        None => return Err(DnssecError::InvalidResponse("RRSIG covers an empty rrset".to_string())),
    };

    if rrset
        .iter()
        .any(|a| !a.name.eq_ignore_ascii_case(&first.name) || a.record_type.to_u16() != first.record_type.to_u16() || a.class != first.class)
    {
        return Err(DnssecError::BadSigningKey("rrset members disagree on name/type/class".to_string()));
    }
    if rrsig.type_covered.to_u16() != first.record_type.to_u16() {
        return Err(DnssecError::BadSigningKey("RRSIG type-covered does not match rrset type".to_string()));
    }
    if rrsig_answer.class != first.class {
        return Err(DnssecError::BadSigningKey("RRSIG class does not match rrset class".to_string()));
    }

    let RecordData::Dnskey(dnskey) = &dnskey_answer.data else {
        return Err(DnssecError::BadSigningKey("candidate key is not a DNSKEY record".to_string()));
    };

    if dnskey_key_tag(dnskey_answer.uncompressed_rdata()) != rrsig.key_tag {
        return Err(DnssecError::BadSigningKey("DNSKEY key tag does not match RRSIG".to_string()));
    }
    if dnskey.algorithm != rrsig.algorithm {
        return Err(DnssecError::BadSigningKey("DNSKEY algorithm does not match RRSIG".to_string()));
    }
    if !rrsig.signer_name.eq_ignore_ascii_case(&dnskey_answer.name) {
        return Err(DnssecError::BadSigningKey("RRSIG signer name does not match DNSKEY owner".to_string()));
    }
    if dnskey.protocol != 3 {
        return Err(DnssecError::BadSigningKey("DNSKEY protocol is not 3".to_string()));
    }
    if !dnskey.is_zone_key() {
        return Err(DnssecError::BadSigningKey("DNSKEY zone-key flag is not set".to_string()));
    }
    if dnskey.is_revoked() {
        return Err(DnssecError::BadSigningKey("DNSKEY is revoked".to_string()));
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0);
    if now < rrsig.signature_inception {
        return Err(DnssecError::BadSigningKey("RRSIG signature is not yet valid".to_string()));
    }
    if now > rrsig.signature_expiration {
        return Err(DnssecError::BadSigningKey("RRSIG signature has expired".to_string()));
    }

    Ok(())
}

/// Tries every DNSKEY in `candidate_keys` against `rrsig`/`rrset` until one validates
/// and cryptographically verifies, or all are exhausted (spec §4.4: "some DNSKEY in the
/// zone signing `signerName(RRSIG)` produces a valid signature").
pub fn verify_rrset(
    rrset: &[&Answer],
    rrsig_answer: &Answer,
    rrsig: &RrsigData,
    candidate_keys: &[Answer],
) -> Result<(), DnssecError> {
    let mut last_error = DnssecError::BadSigningKey("no candidate DNSKEY matched the RRSIG".to_string());
    for dnskey_answer in candidate_keys {
        if let Err(err) = validate_answers(rrset, rrsig_answer, rrsig, dnskey_answer) {
            last_error = err;
            continue;
        }
        let RecordData::Dnskey(dnskey) = &dnskey_answer.data else {
            continue;
        };
        let signed_data = build_signed_data(rrsig, rrset).map_err(|e| DnssecError::InternalError(e.to_string()))?;
        match crate::dnssec::crypto::verify_signature(rrsig.algorithm, &signed_data, &rrsig.signature, &dnskey.public_key) {
            Ok(true) => return Ok(()),
            Ok(false) => {
                last_error = DnssecError::SignatureFailed;
            }
            Err(err) => last_error = err,
        }
    }
    Err(last_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_canonicalization_replaces_leading_labels() {
        let wire = canonical_owner_wire("a.b.example.com.", 2).unwrap();
        let expected = encode_name("*.example.com.").unwrap();
        assert_eq!(wire, expected);
    }

    #[test]
    fn non_wildcard_owner_is_lowercased_only() {
        let wire = canonical_owner_wire("WWW.Example.COM.", 3).unwrap();
        let expected = encode_name("www.example.com.").unwrap();
        assert_eq!(wire, expected);
    }
}
