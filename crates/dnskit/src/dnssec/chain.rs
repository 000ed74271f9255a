//! Chain-of-trust walk: DS→DNSKEY digest matching up the delegation chain and root
//! anchoring (spec §4.4 "Chain walk", "Root anchoring").

use std::collections::HashMap;

use dnskit_domain::answer::DsData;
use dnskit_domain::{Answer, DNSSECResource, DnssecError, RecordData};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384};

use crate::codec::name::encode_name;
use crate::codec::rdata::dnskey_key_tag;
use crate::dnssec::signing::verify_rrset;
use crate::dnssec::trust_anchor;

/// The dot-terminated parent of `zone` (one label stripped), or `.` for the root and
/// any single-label zone directly under it.
pub fn parent_zone(zone: &str) -> String {
    if zone == "." {
        return ".".to_string();
    }
    let trimmed = zone.trim_end_matches('.');
    match trimmed.find('.') {
        Some(idx) => format!("{}.", &trimmed[idx + 1..]),
        None => ".".to_string(),
    }
}

/// `true` if `ds` commits to `dnskey_answer` under `owner_name`: matching key tag and
/// algorithm, and a digest equal to hash(owner-wire ‖ DNSKEY rdata) (spec §4.4 step 2).
fn matches_ds(ds: &DsData, dnskey_answer: &Answer, owner_name: &str) -> bool {
    let RecordData::Dnskey(dnskey) = &dnskey_answer.data else {
        return false;
    };
    if dnskey.algorithm != ds.algorithm {
        return false;
    }
    if dnskey_key_tag(dnskey_answer.uncompressed_rdata()) != ds.key_tag {
        return false;
    }
    let owner_wire = match encode_name(&owner_name.to_ascii_lowercase()) {
        Ok(wire) => wire,
        Err(_) => return false,
    };
    let mut input = owner_wire;
    input.extend_from_slice(dnskey_answer.uncompressed_rdata());
    let digest = match ds.digest_type {
        1 => Sha1::digest(&input).to_vec(),
        2 => Sha256::digest(&input).to_vec(),
        4 => Sha384::digest(&input).to_vec(),
        _ => return false,
    };
    digest == ds.digest
}

/// Verifies that `resource`'s own DNSKEY rrset (and, for non-root zones, its DS rrset)
/// carry a valid RRSIG — the DS rrset's RRSIG is signed by the *parent* zone's keys,
/// since the DS record is served from the parent (spec §4.4 "note: the DS for Z lives
/// in Z's DS message per DNS semantics").
fn verify_resource_signatures(
    zone: &str,
    resource: &DNSSECResource,
    resources: &HashMap<String, DNSSECResource>,
) -> Result<(), DnssecError> {
    let dnskey_rrsig = resource
        .dnskey_rrsig
        .as_ref()
        .ok_or_else(|| DnssecError::MissingKeys(format!("no DNSKEY RRSIG for {zone}")))?;
    let RecordData::Rrsig(dnskey_rrsig_data) = &dnskey_rrsig.data else {
        return Err(DnssecError::InternalError("DNSKEY RRSIG answer carries non-RRSIG data".to_string()));
    };
    let dnskey_rrset: Vec<&Answer> = resource.dnskeys.iter().collect();
    verify_rrset(&dnskey_rrset, dnskey_rrsig, dnskey_rrsig_data, &resource.dnskeys)?;

    if !resource.is_root() {
        if let Some(ds_rrsig) = &resource.ds_rrsig {
            let RecordData::Rrsig(ds_rrsig_data) = &ds_rrsig.data else {
                return Err(DnssecError::InternalError("DS RRSIG answer carries non-RRSIG data".to_string()));
            };
            let parent = resources
                .get(&parent_zone(zone))
                .ok_or_else(|| DnssecError::MissingKeys(format!("missing parent zone resources for {zone}")))?;
            let ds_rrset: Vec<&Answer> = resource.ds_records.iter().collect();
            verify_rrset(&ds_rrset, ds_rrsig, ds_rrsig_data, &parent.dnskeys)?;
        } else if !resource.ds_records.is_empty() {
            return Err(DnssecError::MissingKeys(format!("no DS RRSIG for {zone}")));
        }
    }

    Ok(())
}

/// Walks the chain of trust from `zones` (leaf-to-root order, root included) up to the
/// pinned root anchors, setting `chain_trusted`/`chain_error` on `result` (spec §4.4).
///
/// `hasValidDs` starts false for every zone and the "no valid DS" path is reachable —
/// see spec §9's open question, resolved that way here.
pub fn verify_chain(zones: &[String], resources: &HashMap<String, DNSSECResource>) -> Result<(), DnssecError> {
    let root = resources.get(".").ok_or_else(|| DnssecError::MissingKeys(".".to_string()))?;

    let root_ksk_trusted = root.dnskeys.iter().any(|dnskey_answer| match &dnskey_answer.data {
        RecordData::Dnskey(dk) => dk.is_key_signing_key() && trust_anchor::is_trusted(dk.algorithm, &dk.public_key),
        _ => false,
    });
    if !root_ksk_trusted {
        return Err(DnssecError::UntrustedRootSigningKey);
    }
    verify_resource_signatures(".", root, resources)?;

    for zone in zones.iter().filter(|z| z.as_str() != ".") {
        let resource = resources
            .get(zone)
            .ok_or_else(|| DnssecError::MissingKeys(format!("missing resources for {zone}")))?;

        verify_resource_signatures(zone, resource, resources)?;

        let mut has_valid_ds = false;
        for ds_answer in &resource.ds_records {
            let RecordData::Ds(ds) = &ds_answer.data else {
                continue;
            };
            if resource.dnskeys.iter().any(|dnskey_answer| matches_ds(ds, dnskey_answer, &resource.zone_name)) {
                has_valid_ds = true;
                break;
            }
        }
        if !has_valid_ds {
            return Err(DnssecError::MissingKeys(format!("no DS record in the parent commits to any DNSKEY in {zone}")));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_of_second_level_is_tld() {
        assert_eq!(parent_zone("example.com."), "com.");
    }

    #[test]
    fn parent_of_tld_is_root() {
        assert_eq!(parent_zone("com."), ".");
    }

    #[test]
    fn parent_of_root_is_root() {
        assert_eq!(parent_zone("."), ".");
    }
}
