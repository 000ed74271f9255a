//! Minimal ASN.1 DER encoder covering just what DNSSEC signature reformatting needs
//! (spec §4.4): wrapping an RSA public key as `SEQUENCE { INTEGER n, INTEGER e }` and an
//! ECDSA raw R‖S signature as `SEQUENCE { INTEGER r, INTEGER s }`.

/// DER INTEGER, prefixing a 0x00 pad byte when the high bit of the leading byte is set
/// (otherwise the value would decode as negative) and stripping redundant leading
/// zero bytes from the input first.
pub fn encode_integer(bytes: &[u8]) -> Vec<u8> {
    let mut value = bytes;
    while value.len() > 1 && value[0] == 0 {
        value = &value[1..];
    }
    let needs_pad = value.first().is_some_and(|b| b & 0x80 != 0);
    let content_len = value.len() + usize::from(needs_pad);

    let mut out = Vec::with_capacity(2 + content_len);
    out.push(0x02); // INTEGER tag
    encode_length(&mut out, content_len);
    if needs_pad {
        out.push(0x00);
    }
    out.extend_from_slice(value);
    out
}

/// DER SEQUENCE wrapping already-encoded `elements`.
pub fn encode_sequence(elements: &[Vec<u8>]) -> Vec<u8> {
    let content_len: usize = elements.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(2 + content_len);
    out.push(0x30); // SEQUENCE tag
    encode_length(&mut out, content_len);
    for element in elements {
        out.extend_from_slice(element);
    }
    out
}

fn encode_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let len_bytes = len.to_be_bytes();
    let first_nonzero = len_bytes.iter().position(|&b| b != 0).unwrap_or(len_bytes.len() - 1);
    let significant = &len_bytes[first_nonzero..];
    out.push(0x80 | significant.len() as u8);
    out.extend_from_slice(significant);
}

/// Wraps a DNSSEC-wire RSA public key (`exponent-length ‖ exponent ‖ modulus`) as a
/// PKCS#1 `RSAPublicKey` DER structure. Kept for parity with the spec's described
/// reformat; `dnssec::crypto` verifies RSA directly against the raw components since
/// `ring` has no API that accepts a DER-wrapped RSA public key (see DESIGN.md).
pub fn encode_rsa_public_key(exponent: &[u8], modulus: &[u8]) -> Vec<u8> {
    encode_sequence(&[encode_integer(modulus), encode_integer(exponent)])
}

/// Wraps a raw ECDSA signature (equal-length `r ‖ s`) as a DER `SEQUENCE { INTEGER r,
/// INTEGER s }`, the form `ring::signature::ECDSA_P256_SHA256_ASN1` / `_P384_SHA384_ASN1`
/// expect.
pub fn encode_ecdsa_signature(raw: &[u8]) -> Option<Vec<u8>> {
    if raw.len() % 2 != 0 {
        return None;
    }
    let half = raw.len() / 2;
    let (r, s) = raw.split_at(half);
    Some(encode_sequence(&[encode_integer(r), encode_integer(s)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_pads_high_bit() {
        let encoded = encode_integer(&[0x80]);
        assert_eq!(encoded, vec![0x02, 0x02, 0x00, 0x80]);
    }

    #[test]
    fn integer_strips_leading_zero_without_padding_twice() {
        let encoded = encode_integer(&[0x00, 0x01]);
        assert_eq!(encoded, vec![0x02, 0x01, 0x01]);
    }

    #[test]
    fn ecdsa_signature_splits_evenly() {
        let raw = vec![1u8; 64];
        let der = encode_ecdsa_signature(&raw).unwrap();
        assert_eq!(der[0], 0x30);
    }

    #[test]
    fn ecdsa_signature_rejects_odd_length() {
        assert!(encode_ecdsa_signature(&[1, 2, 3]).is_none());
    }

    #[test]
    fn rsa_public_key_is_sequence_of_two_integers() {
        let der = encode_rsa_public_key(&[1, 0, 1], &[0xff, 0x01]);
        assert_eq!(der[0], 0x30);
    }

    #[test]
    fn long_form_length_used_above_127_bytes() {
        let modulus = vec![0x7f; 200];
        let encoded = encode_integer(&modulus);
        // 200 content bytes, no pad needed (0x7f high bit clear); length encodes as
        // long form since 200 >= 0x80.
        assert_eq!(encoded[1] & 0x80, 0x80);
    }
}
