use dnskit_domain::answer::ErrorRecord;
use dnskit_domain::{Answer, DomainError, Message, MessageFlags, Question, QueryOptions, RecordData, RecordType};

use crate::codec::name::{decode_name, encode_name};
use crate::codec::rdata::decode_rdata;

const HEADER_LEN: usize = 12;

/// Maximum UDP payload size advertised in the outbound EDNS(0) OPT record (spec §4.1).
const EDNS_UDP_PAYLOAD_SIZE: u16 = 4096;

/// "DNSSEC OK" bit within the EDNS extended flags (RFC 3225).
const EDNS_DNSSEC_OK: u32 = 1 << 15;

/// Encodes an outbound query for `question`, stamping recursion-desired, a single
/// question, and the EDNS(0) OPT additional record (spec §4.1 "Outbound encoding").
///
/// `id` is caller-supplied so the dispatcher can correlate replies; HTTPS transport
/// overwrites it to zero right before sending per RFC 8484 §4.1 (spec §4.1).
pub fn encode_query(id: u16, question: &Question, options: QueryOptions) -> Result<Vec<u8>, DomainError> {
    let mut out = Vec::with_capacity(32);
    out.extend_from_slice(&id.to_be_bytes());
    out.extend_from_slice(&MessageFlags::query_with_recursion().to_u16().to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes()); // QDCOUNT
    out.extend_from_slice(&0u16.to_be_bytes()); // ANCOUNT
    out.extend_from_slice(&0u16.to_be_bytes()); // NSCOUNT
    out.extend_from_slice(&1u16.to_be_bytes()); // ARCOUNT: exactly one OPT record

    out.extend_from_slice(&encode_name(&question.name)?);
    out.extend_from_slice(&question.record_type.to_u16().to_be_bytes());
    out.extend_from_slice(&question.class.to_be_bytes());

    encode_opt_record(&mut out, options.dnssec_requested);
    Ok(out)
}

fn encode_opt_record(out: &mut Vec<u8>, dnssec_requested: bool) {
    out.push(0); // name = root
    out.extend_from_slice(&RecordType::OPT.to_u16().to_be_bytes());
    out.extend_from_slice(&EDNS_UDP_PAYLOAD_SIZE.to_be_bytes()); // class carries UDP payload size
    out.push(0); // extended-RCODE
    out.push(0); // EDNS version
    let z_flags: u32 = if dnssec_requested { EDNS_DNSSEC_OK } else { 0 };
    out.extend_from_slice(&(z_flags as u16).to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // rdlength = 0
}

/// Frames an already-encoded message for TCP/TLS/QUIC transports: a 16-bit big-endian
/// length prefix followed by the message (spec §4.1 / §4.2).
pub fn frame_with_length_prefix(message: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(message.len() + 2);
    out.extend_from_slice(&(message.len() as u16).to_be_bytes());
    out.extend_from_slice(message);
    out
}

/// Decodes a full DNS message (spec §4.1 "Message layout").
///
/// The codec reads all four sections but exposes only questions and answers; authority
/// and additional are walked for structural validity and their counts retained.
pub fn decode_message(bytes: &[u8]) -> Result<Message, DomainError> {
    if bytes.len() < HEADER_LEN {
        return Err(DomainError::InvalidData("too short".to_string()));
    }

    let id = be_u16(bytes, 0);
    let flags = MessageFlags::from_u16(be_u16(bytes, 2));
    let qd_count = be_u16(bytes, 4);
    let an_count = be_u16(bytes, 6);
    let ns_count = be_u16(bytes, 8);
    let ar_count = be_u16(bytes, 10);

    let mut cursor = HEADER_LEN;

    let mut questions = Vec::with_capacity(qd_count as usize);
    for _ in 0..qd_count {
        let (name, next) = decode_name(bytes, cursor)?;
        let type_end = next + 4;
        let fields = bytes
            .get(next..type_end)
            .ok_or_else(|| DomainError::InvalidData("truncated question".to_string()))?;
        questions.push(Question {
            name,
            record_type: RecordType::from_u16(be_u16(fields, 0)),
            class: be_u16(fields, 2),
        });
        cursor = type_end;
    }

    let mut answers = Vec::with_capacity(an_count as usize);
    for _ in 0..an_count {
        let (answer, next) = decode_answer(bytes, cursor)?;
        answers.push(answer);
        cursor = next;
    }

    // Authority and additional sections are structurally validated (each record's
    // name/type/class/ttl/rdlength must fit) but not exposed to callers.
    for _ in 0..(ns_count as usize + ar_count as usize) {
        let (_, next) = decode_answer(bytes, cursor)?;
        cursor = next;
    }

    Ok(Message {
        id,
        flags,
        questions,
        answers,
        authority_count: ns_count,
        additional_count: ar_count,
    })
}

fn decode_answer(bytes: &[u8], offset: usize) -> Result<(Answer, usize), DomainError> {
    let (name, next) = decode_name(bytes, offset)?;
    let fixed_end = next + 10;
    let fixed = bytes
        .get(next..fixed_end)
        .ok_or_else(|| DomainError::InvalidData("truncated answer header".to_string()))?;
    let record_type = RecordType::from_u16(be_u16(fixed, 0));
    let class = be_u16(fixed, 2);
    let ttl = be_u32(fixed, 4);
    let rdlength = be_u16(fixed, 8) as usize;

    let rdata_offset = fixed_end;
    let rdata_end = rdata_offset + rdlength;
    if rdata_end > bytes.len() {
        return Err(DomainError::InvalidData("rdlength exceeds remaining message bytes".to_string()));
    }
    let raw_rdata = bytes[rdata_offset..rdata_end].to_vec();

    // One malformed record never aborts the whole message (spec §4.1/§7): a decode
    // failure inside a known type demotes this answer's data to `ErrorRecord`.
    let (data, uncompressed_rdata) = match decode_rdata(bytes, record_type, rdata_offset, rdlength) {
        Ok(decoded) => decoded,
        Err(err) => (RecordData::Error(ErrorRecord::from(&err)), raw_rdata.clone()),
    };

    let answer = Answer::new(name, record_type, class, ttl, raw_rdata, uncompressed_rdata, data);
    Ok((answer, rdata_end))
}

fn be_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([bytes[offset], bytes[offset + 1]])
}

fn be_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnskit_domain::Question;

    #[test]
    fn rejects_truncated_message() {
        let bytes = vec![0u8; 11];
        assert!(decode_message(&bytes).is_err());
    }

    #[test]
    fn encodes_query_with_single_question_and_opt_record() {
        let question = Question::new("example.com.", RecordType::A);
        let encoded = encode_query(42, &question, QueryOptions::default()).unwrap();
        assert_eq!(&encoded[0..2], &42u16.to_be_bytes());
        assert_eq!(&encoded[4..6], &1u16.to_be_bytes()); // QDCOUNT
        assert_eq!(&encoded[10..12], &1u16.to_be_bytes()); // ARCOUNT
    }

    #[test]
    fn dnssec_requested_sets_do_bit() {
        let question = Question::new("example.com.", RecordType::A);
        let options = QueryOptions { dnssec_requested: true };
        let encoded = encode_query(1, &question, options).unwrap();
        // Z flags are the two bytes right after EDNS version, at the tail of the OPT
        // record: name(1) + type(2) + class(2) + ext-rcode(1) + version(1) = 7 bytes in.
        let opt_start = encoded.len() - 11;
        let z = u16::from_be_bytes([encoded[opt_start + 7], encoded[opt_start + 8]]);
        assert_eq!(z, 0x8000);
    }

    #[test]
    fn decodes_counts_matching_list_lengths() {
        let question = Question::new("example.com.", RecordType::A);
        let encoded = encode_query(7, &question, QueryOptions::default()).unwrap();
        let message = decode_message(&encoded).unwrap();
        assert_eq!(message.questions.len(), 1);
        assert_eq!(message.answers.len(), 0);
    }
}
