//! Wire-format fixtures and scenarios from the testable-properties list that don't
//! require network access.

use dnskit::codec::{decode_message, encode_query};
use dnskit::codec::name::decode_name;
use dnskit_domain::{Question, QueryOptions, RecordType};

#[test]
fn compressed_name_decode_matches_the_literal_fixture() {
    let message = [
        0x03, 0x64, 0x6e, 0x73, 0x06, 0x67, 0x6f, 0x6f, 0x67, 0x6c, 0x65, 0x00, 0xc0, 0x00,
    ];

    let (name, next_offset) = decode_name(&message, 12).unwrap();
    assert_eq!(name, "dns.google.");
    assert_eq!(next_offset, 14);
}

#[test]
fn pointer_loop_is_rejected() {
    let message: Vec<u8> = vec![0xc0, 0x00, 0xc0, 0x00];
    assert!(decode_name(&message, 2).is_err());
}

#[test]
fn truncated_reply_is_invalid_data() {
    let bytes = vec![0u8; 11];
    assert!(decode_message(&bytes).is_err());
}

#[test]
fn encoded_query_round_trips_its_question() {
    let question = Question::new("example.com.", RecordType::A);
    let encoded = encode_query(0xbeef, &question, QueryOptions::default()).unwrap();

    // The OPT record makes ARCOUNT=1 so a bare `decode_message` round trip only sees
    // the question; the answer-producing half of this law is exercised by `decode_answer`
    // unit tests in the codec module itself, against synthetic reply bytes.
    let decoded = decode_message(&encoded).unwrap();
    assert_eq!(decoded.id, 0xbeef);
    assert_eq!(decoded.questions.len(), 1);
    assert_eq!(decoded.questions[0].name, "example.com.");
    assert_eq!(decoded.questions[0].record_type, RecordType::A);
}
