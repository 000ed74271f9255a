//! DNS wire codec: name compression, message framing, and per-type record-data decoding
//! (spec §4.1).

pub mod message;
pub mod name;
pub mod rdata;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

pub use message::{decode_message, encode_query, frame_with_length_prefix};
pub use rdata::dnskey_key_tag;

/// Base64url-encodes (no padding) an already-encoded message for the HTTPS `dns=` query
/// parameter (spec §4.1 / RFC 8484 §4.1). Encodes `message` verbatim; the HTTPS
/// transport zeroes the id before calling this, since only it needs that rewrite.
pub fn encode_dns_query_param(message: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64url_has_no_padding_or_plus_slash() {
        let encoded = encode_dns_query_param(&[0xff, 0xee, 0xdd, 0xcc]);
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
        assert!(!encoded.contains('='));
    }
}
