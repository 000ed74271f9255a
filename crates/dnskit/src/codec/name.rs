use dnskit_domain::DomainError;

/// Depth limit on pointer chains while decoding a compressed name (spec §4.1: "a depth
/// limit (≥ 10)" bounds work and rejects pointer cycles).
const MAX_POINTER_HOPS: usize = 16;

/// Encodes `name` as a sequence of length-prefixed labels terminated by a zero byte
/// (spec §4.1). Case is preserved; an empty non-terminal label is rejected.
pub fn encode_name(name: &str) -> Result<Vec<u8>, DomainError> {
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    let mut out = Vec::new();
    if trimmed.is_empty() {
        out.push(0);
        return Ok(out);
    }
    for label in trimmed.split('.') {
        if label.is_empty() {
            return Err(DomainError::InvalidData("empty label in name".to_string()));
        }
        if label.len() > 63 {
            return Err(DomainError::InvalidData("label exceeds 63 bytes".to_string()));
        }
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    if out.len() > 255 {
        return Err(DomainError::InvalidData("encoded name exceeds 255 bytes".to_string()));
    }
    Ok(out)
}

/// Decodes a name starting at `offset` within `message`, following compression
/// pointers as needed (spec §4.1). Returns the dot-terminated name and the offset the
/// caller should resume parsing from: one past the terminating zero, or one past the
/// first pointer taken (whichever came first in the walk).
pub fn decode_name(message: &[u8], offset: usize) -> Result<(String, usize), DomainError> {
    let mut cursor = offset;
    let mut labels: Vec<String> = Vec::new();
    let mut resume_offset: Option<usize> = None;
    let mut hops = 0usize;

    loop {
        let byte = *message
            .get(cursor)
            .ok_or_else(|| DomainError::InvalidData("name decode past end of message".to_string()))?;

        if byte & 0xc0 == 0xc0 {
            hops += 1;
            if hops > MAX_POINTER_HOPS {
                return Err(DomainError::InvalidData("name pointer depth exceeded".to_string()));
            }
            let lo = *message
                .get(cursor + 1)
                .ok_or_else(|| DomainError::InvalidData("truncated name pointer".to_string()))?;
            let target = (((byte & 0x3f) as usize) << 8) | lo as usize;
            if resume_offset.is_none() {
                resume_offset = Some(cursor + 2);
            }
            if target >= cursor {
                return Err(DomainError::InvalidData("name pointer does not go backward".to_string()));
            }
            if target >= message.len() {
                return Err(DomainError::InvalidData("name pointer target out of range".to_string()));
            }
            cursor = target;
            continue;
        }

        if byte == 0 {
            if resume_offset.is_none() {
                resume_offset = Some(cursor + 1);
            }
            break;
        }

        let len = byte as usize;
        if byte & 0xc0 != 0 {
            return Err(DomainError::InvalidData("reserved label length bits set".to_string()));
        }
        let start = cursor + 1;
        let end = start + len;
        let label_bytes = message
            .get(start..end)
            .ok_or_else(|| DomainError::InvalidData("truncated name label".to_string()))?;
        if label_bytes.iter().any(|&b| !(0x20..=0x7e).contains(&b) || b == b'.') {
            return Err(DomainError::InvalidData("non-printable byte in name label".to_string()));
        }
        labels.push(String::from_utf8_lossy(label_bytes).into_owned());
        cursor = end;
    }

    let mut name = String::new();
    for label in &labels {
        name.push_str(label);
        name.push('.');
    }
    if name.is_empty() {
        name.push('.');
    }

    Ok((name, resume_offset.expect("resume offset always set before loop exit")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_simple_name() {
        let encoded = encode_name("dns.google.").unwrap();
        assert_eq!(
            encoded,
            vec![3, b'd', b'n', b's', 6, b'g', b'o', b'o', b'g', b'l', b'e', 0]
        );
    }

    #[test]
    fn encodes_root_as_single_zero_byte() {
        assert_eq!(encode_name(".").unwrap(), vec![0]);
    }

    #[test]
    fn rejects_empty_interior_label() {
        assert!(encode_name("foo..com.").is_err());
    }

    #[test]
    fn decodes_compressed_name_from_spec_example() {
        let message = vec![
            0x03, b'd', b'n', b's', 0x06, b'g', b'o', b'o', b'g', b'l', b'e', 0x00, 0xc0, 0x00,
        ];
        let (name, next) = decode_name(&message, 12).unwrap();
        assert_eq!(name, "dns.google.");
        assert_eq!(next, 14);
    }

    #[test]
    fn follows_pointer_to_compressed_suffix() {
        let mut message = vec![0u8; 12];
        message.extend_from_slice(&[
            0x03, b'd', b'n', b's', 0x06, b'g', b'o', b'o', b'g', b'l', b'e', 0x00,
        ]);
        message.extend_from_slice(&[0x03, b'w', b'w', b'w', 0xc0, 12]);
        let (name, _) = decode_name(&message, 24).unwrap();
        assert_eq!(name, "www.dns.google.");
    }

    #[test]
    fn rejects_pointer_loop() {
        let message: Vec<u8> = vec![0xc0, 0x00, 0xc0, 0x00];
        let result = decode_name(&message, 2);
        assert!(result.is_err());
    }

    #[test]
    fn round_trips_via_string_to_name_and_back() {
        let name = "example.com.";
        let encoded = encode_name(name).unwrap();
        let mut message = encoded.clone();
        message.push(0); // padding so decode has somewhere to stop if it overruns
        let (decoded, _) = decode_name(&message, 0).unwrap();
        assert_eq!(decoded, name);
    }
}
