//! Signature verification for the DNSSEC algorithms in spec §4.3's table, plus the
//! RSA-key / ECDSA-signature reformatting spec §4.4 describes.

use dnskit_domain::DnssecError;
use ring::signature;

use crate::support::asn1;

pub const ALG_RSA_SHA1: u8 = 5;
pub const ALG_RSA_SHA256: u8 = 8;
pub const ALG_RSA_SHA512: u8 = 10;
pub const ALG_ECDSA_P256_SHA256: u8 = 13;
pub const ALG_ECDSA_P384_SHA384: u8 = 14;

/// Verifies `signature_bytes` over `signed_data` under `public_key`, dispatching on the
/// RRSIG algorithm code (spec §4.4 algorithm table). An algorithm outside that table is
/// `badSigningKey`, not a crypto failure.
pub fn verify_signature(
    algorithm: u8,
    signed_data: &[u8],
    signature_bytes: &[u8],
    public_key: &[u8],
) -> Result<bool, DnssecError> {
    match algorithm {
        // RSA/SHA-1 is parsed but explicitly rejected at verification (spec §4.4).
        ALG_RSA_SHA1 => Ok(false),
        ALG_RSA_SHA256 => verify_rsa(public_key, signed_data, signature_bytes, &signature::RSA_PKCS1_2048_8192_SHA256),
        ALG_RSA_SHA512 => verify_rsa(public_key, signed_data, signature_bytes, &signature::RSA_PKCS1_2048_8192_SHA512),
        ALG_ECDSA_P256_SHA256 => verify_ecdsa_p256(public_key, signed_data, signature_bytes),
        ALG_ECDSA_P384_SHA384 => verify_ecdsa_p384(public_key, signed_data, signature_bytes),
        other => Err(DnssecError::BadSigningKey(format!("unsupported algorithm {other}"))),
    }
}

/// RSA PKCS#1 v1.5 verification. `ring::signature::RsaPublicKeyComponents` takes the
/// raw modulus/exponent directly, so unlike the ECDSA path below no ASN.1 reformat is
/// needed here (see `support::asn1::encode_rsa_public_key` doc comment for why that
/// helper exists anyway, kept for parity with the spec's described reformat).
fn verify_rsa(
    public_key: &[u8],
    data: &[u8],
    sig: &[u8],
    params: &'static signature::RsaParameters,
) -> Result<bool, DnssecError> {
    let (exponent, modulus) = parse_rsa_key(public_key)?;
    let key = signature::RsaPublicKeyComponents { n: &modulus, e: &exponent };
    Ok(key.verify(params, data, sig).is_ok())
}

fn verify_ecdsa_p256(public_key: &[u8], data: &[u8], sig: &[u8]) -> Result<bool, DnssecError> {
    if public_key.len() != 64 {
        return Err(DnssecError::BadSigningKey("ECDSA P-256 public key must be 64 bytes".to_string()));
    }
    let der_sig = asn1::encode_ecdsa_signature(sig)
        .ok_or_else(|| DnssecError::BadSigningKey("ECDSA P-256 signature must be an even length".to_string()))?;
    let mut point = Vec::with_capacity(65);
    point.push(0x04); // uncompressed SEC1 point prefix; DNSKEY stores the bare X||Y
    point.extend_from_slice(public_key);
    let key = signature::UnparsedPublicKey::new(&signature::ECDSA_P256_SHA256_ASN1, &point);
    Ok(key.verify(data, &der_sig).is_ok())
}

fn verify_ecdsa_p384(public_key: &[u8], data: &[u8], sig: &[u8]) -> Result<bool, DnssecError> {
    if public_key.len() != 96 {
        return Err(DnssecError::BadSigningKey("ECDSA P-384 public key must be 96 bytes".to_string()));
    }
    let der_sig = asn1::encode_ecdsa_signature(sig)
        .ok_or_else(|| DnssecError::BadSigningKey("ECDSA P-384 signature must be an even length".to_string()))?;
    let mut point = Vec::with_capacity(97);
    point.push(0x04);
    point.extend_from_slice(public_key);
    let key = signature::UnparsedPublicKey::new(&signature::ECDSA_P384_SHA384_ASN1, &point);
    Ok(key.verify(data, &der_sig).is_ok())
}

/// Parses a DNSSEC-wire RSA public key: a short or long-form exponent-length prefix,
/// the exponent, then the modulus (spec §4.4).
fn parse_rsa_key(key_data: &[u8]) -> Result<(Vec<u8>, Vec<u8>), DnssecError> {
    if key_data.is_empty() {
        return Err(DnssecError::BadSigningKey("empty RSA public key".to_string()));
    }
    let first = key_data[0];
    let (exp_len, exp_start) = if first == 0 {
        if key_data.len() < 3 {
            return Err(DnssecError::BadSigningKey("RSA key too short for long-form exponent length".to_string()));
        }
        (u16::from_be_bytes([key_data[1], key_data[2]]) as usize, 3)
    } else {
        (first as usize, 1)
    };
    let exp_end = exp_start + exp_len;
    if exp_end > key_data.len() {
        return Err(DnssecError::BadSigningKey("RSA exponent extends beyond key data".to_string()));
    }
    let exponent = key_data[exp_start..exp_end].to_vec();
    let modulus = key_data[exp_end..].to_vec();
    if modulus.is_empty() {
        return Err(DnssecError::BadSigningKey("RSA modulus is empty".to_string()));
    }
    Ok((exponent, modulus))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsa_sha1_is_always_rejected() {
        let result = verify_signature(ALG_RSA_SHA1, b"data", b"sig", b"key");
        assert_eq!(result, Ok(false));
    }

    #[test]
    fn unknown_algorithm_is_bad_signing_key() {
        let result = verify_signature(200, b"data", b"sig", b"key");
        assert!(matches!(result, Err(DnssecError::BadSigningKey(_))));
    }

    #[test]
    fn parses_short_form_rsa_exponent() {
        let mut key = vec![3u8, 1, 0, 1];
        key.extend_from_slice(&[0xaa; 32]);
        let (exponent, modulus) = parse_rsa_key(&key).unwrap();
        assert_eq!(exponent, vec![1, 0, 1]);
        assert_eq!(modulus, vec![0xaa; 32]);
    }

    #[test]
    fn rejects_undersized_ecdsa_p256_key() {
        let result = verify_ecdsa_p256(&[0u8; 10], b"data", &[0u8; 64]);
        assert!(matches!(result, Err(DnssecError::BadSigningKey(_))));
    }
}
