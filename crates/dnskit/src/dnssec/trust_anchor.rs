//! Pinned root-zone trust anchors (spec §3 "Trust-anchor table", §4.4 "Root anchoring").
//!
//! Extending this list is the only mechanism for rotating the trust root; there is no
//! runtime loader (no RFC 7958 XML fetch, no `managed-keys`-style auto-update).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// One pinned root-zone key-signing key.
pub struct TrustAnchor {
    pub description: &'static str,
    pub algorithm: u8,
    pub public_key_base64: &'static str,
}

/// Compile-time root KSK table. KSK-2017 (key tag 20326) is the sole active root KSK
/// as of this writing (IANA: <https://www.iana.org/dnssec/files>); the planned
/// KSK-2024 rollover was paused, so only one entry is pinned here.
pub const ROOT_TRUST_ANCHORS: &[TrustAnchor] = &[TrustAnchor {
    description: "Root KSK-2017 (key tag 20326)",
    algorithm: 8,
    public_key_base64: concat!(
        "AwEAAaz/tAm8yTn4Mfeh5eyI96WSVexTBAvkMgJzkKTOiW1vkIbzxeF3",
        "+/4RgWOq7HrxRixHlFlExOLAJr5emLvN7SWXgnLh4+B5xQlNVz8Og8kv",
        "ArMtNROxVQuCaSnIDdD5LKyWbRd2n9WGe2R8PzgCmr3EgVLrjyBxWezF",
        "0jLHwVN8efS3rCj/EWgvIWgb9tarpVUDK/b58Da+sqqls3eNbuv7pr+e",
        "oZG+SrDK6nWeL3c6H5Apxz7LjVc1uTIdsIXxuOLYA4/ilBmSVIzuDWfd",
        "RUfhHdY6+cn8HFRm+2hM8AnXGXws9555KrUB5qihylGa8subX2Nn6UwN",
        "R1AkUTV74bU="
    ),
}];

/// `true` if `public_key` (raw DNSKEY public-key bytes) matches a pinned root KSK for
/// `algorithm` (spec §4.4: "at least one MUST have publicKey bytes equal to some entry
/// in the trust-anchor table").
pub fn is_trusted(algorithm: u8, public_key: &[u8]) -> bool {
    ROOT_TRUST_ANCHORS.iter().any(|anchor| {
        anchor.algorithm == algorithm
            && STANDARD
                .decode(anchor.public_key_base64)
                .map(|decoded| decoded == public_key)
                .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_ksk_2017_is_trusted() {
        let decoded = STANDARD.decode(ROOT_TRUST_ANCHORS[0].public_key_base64).unwrap();
        assert!(is_trusted(8, &decoded));
    }

    #[test]
    fn unknown_key_is_not_trusted() {
        assert!(!is_trusted(8, &[1, 2, 3, 4]));
    }

    #[test]
    fn matching_bytes_with_wrong_algorithm_is_not_trusted() {
        let decoded = STANDARD.decode(ROOT_TRUST_ANCHORS[0].public_key_base64).unwrap();
        assert!(!is_trusted(13, &decoded));
    }
}
