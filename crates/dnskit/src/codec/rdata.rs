use std::net::{Ipv4Addr, Ipv6Addr};

use dnskit_domain::answer::{
    AData, AaaaData, DnskeyData, DsData, LocData, MxData, NameData, Nsec3Data, NsecData,
    RecordData, RrsigData, SoaData, SrvData, SvcParam, SvcbData, TxtData,
};
use dnskit_domain::{DomainError, RecordType};

use crate::codec::name::{decode_name, encode_name};

/// Decodes the type-specific portion of an answer's rdata (spec §4.1).
///
/// Returns both the typed `RecordData` and the *uncompressed* rdata image: any name
/// embedded in the record is decompressed and re-encoded so the bytes are independent of
/// where, in the original message, the record happened to be positioned. That image is
/// what RRSIG signature verification hashes (spec §4.4 step 3).
pub fn decode_rdata(
    message: &[u8],
    record_type: RecordType,
    rdata_offset: usize,
    rdata_len: usize,
) -> Result<(RecordData, Vec<u8>), DomainError> {
    let rdata = message
        .get(rdata_offset..rdata_offset + rdata_len)
        .ok_or_else(|| DomainError::InvalidData("rdata exceeds message bounds".to_string()))?;

    match record_type {
        RecordType::A => {
            if rdata.len() != 4 {
                return Err(DomainError::InvalidData("A record must be 4 bytes".to_string()));
            }
            let address = Ipv4Addr::new(rdata[0], rdata[1], rdata[2], rdata[3]);
            Ok((RecordData::A(AData { address }), rdata.to_vec()))
        }
        RecordType::AAAA => {
            if rdata.len() != 16 {
                return Err(DomainError::InvalidData("AAAA record must be 16 bytes".to_string()));
            }
            let mut octets = [0u8; 16];
            octets.copy_from_slice(rdata);
            Ok((
                RecordData::Aaaa(AaaaData {
                    address: Ipv6Addr::from(octets),
                }),
                rdata.to_vec(),
            ))
        }
        RecordType::NS | RecordType::CNAME | RecordType::PTR => {
            let (name, _) = decode_name(message, rdata_offset)?;
            let uncompressed = encode_name(&name)?;
            let data = NameData { name };
            let record = match record_type {
                RecordType::NS => RecordData::Ns(data),
                RecordType::CNAME => RecordData::Cname(data),
                _ => RecordData::Ptr(data),
            };
            Ok((record, uncompressed))
        }
        RecordType::SOA => decode_soa(message, rdata_offset),
        RecordType::MX => decode_mx(message, rdata_offset),
        RecordType::SRV => decode_srv(message, rdata_offset, rdata),
        RecordType::TXT => decode_txt(rdata),
        RecordType::LOC => decode_loc(rdata),
        RecordType::SVCB | RecordType::HTTPS => decode_svcb(message, rdata_offset, rdata, record_type),
        RecordType::DS => decode_ds(rdata),
        RecordType::RRSIG => decode_rrsig(message, rdata_offset, rdata),
        RecordType::DNSKEY => decode_dnskey(rdata),
        RecordType::NSEC => decode_nsec(message, rdata_offset, rdata),
        RecordType::NSEC3 => decode_nsec3(rdata),
        RecordType::OPT | RecordType::Unknown(_) => {
            Err(DomainError::IncorrectType(format!("unsupported record type {record_type}")))
        }
    }
}

fn decode_soa(message: &[u8], offset: usize) -> Result<(RecordData, Vec<u8>), DomainError> {
    let (primary_name_server, next) = decode_name(message, offset)?;
    let (responsible_mailbox, next) = decode_name(message, next)?;
    let tail = message
        .get(next..next + 20)
        .ok_or_else(|| DomainError::InvalidData("truncated SOA record".to_string()))?;
    let mut uncompressed = encode_name(&primary_name_server)?;
    uncompressed.extend_from_slice(&encode_name(&responsible_mailbox)?);
    uncompressed.extend_from_slice(tail);
    Ok((
        RecordData::Soa(SoaData {
            primary_name_server,
            responsible_mailbox,
            serial: be_u32(tail, 0),
            refresh_seconds: be_u32(tail, 4),
            retry_seconds: be_u32(tail, 8),
            expire_seconds: be_u32(tail, 12),
            minimum_ttl: be_u32(tail, 16),
        }),
        uncompressed,
    ))
}

fn decode_mx(message: &[u8], offset: usize) -> Result<(RecordData, Vec<u8>), DomainError> {
    let preference = be_u16(
        message
            .get(offset..offset + 2)
            .ok_or_else(|| DomainError::InvalidData("truncated MX preference".to_string()))?,
        0,
    );
    let (exchange, _) = decode_name(message, offset + 2)?;
    let mut uncompressed = preference.to_be_bytes().to_vec();
    uncompressed.extend_from_slice(&encode_name(&exchange)?);
    Ok((RecordData::Mx(MxData { preference, exchange }), uncompressed))
}

fn decode_srv(message: &[u8], offset: usize, rdata: &[u8]) -> Result<(RecordData, Vec<u8>), DomainError> {
    if rdata.len() < 6 {
        return Err(DomainError::InvalidData("truncated SRV record".to_string()));
    }
    let priority = be_u16(rdata, 0);
    let weight = be_u16(rdata, 2);
    let port = be_u16(rdata, 4);
    let (target, _) = decode_name(message, offset + 6)?;
    let mut uncompressed = Vec::with_capacity(6 + target.len());
    uncompressed.extend_from_slice(&priority.to_be_bytes());
    uncompressed.extend_from_slice(&weight.to_be_bytes());
    uncompressed.extend_from_slice(&port.to_be_bytes());
    uncompressed.extend_from_slice(&encode_name(&target)?);
    Ok((
        RecordData::Srv(SrvData {
            priority,
            weight,
            port,
            target,
        }),
        uncompressed,
    ))
}

fn decode_txt(rdata: &[u8]) -> Result<(RecordData, Vec<u8>), DomainError> {
    let mut text = String::new();
    let mut cursor = 0usize;
    while cursor < rdata.len() {
        let len = rdata[cursor] as usize;
        let start = cursor + 1;
        let end = start + len;
        if end > rdata.len() {
            return Err(DomainError::InvalidData("TXT substring overruns rdata".to_string()));
        }
        text.push_str(&String::from_utf8_lossy(&rdata[start..end]));
        cursor = end;
    }
    Ok((RecordData::Txt(TxtData { text }), rdata.to_vec()))
}

fn decode_loc(rdata: &[u8]) -> Result<(RecordData, Vec<u8>), DomainError> {
    if rdata.len() != 16 {
        return Err(DomainError::InvalidData("LOC record must be 16 bytes".to_string()));
    }
    let version = rdata[0];
    if version != 0 {
        return Err(DomainError::InvalidData(format!("unsupported LOC version {version}")));
    }
    let decode_precision = |byte: u8| -> f64 {
        let mantissa = (byte >> 4) as f64;
        let exponent = (byte & 0x0f) as u32;
        mantissa * 10f64.powi(exponent as i32)
    };
    let size_meters = decode_precision(rdata[1]) / 100.0;
    let horizontal_precision_meters = decode_precision(rdata[2]) / 100.0;
    let vertical_precision_meters = decode_precision(rdata[3]) / 100.0;
    let latitude = (be_u32(rdata, 4) as i64 - (1i64 << 31)) as f64 / 3_600_000.0;
    let longitude = (be_u32(rdata, 8) as i64 - (1i64 << 31)) as f64 / 3_600_000.0;
    let altitude_meters = (be_u32(rdata, 12) as i64 - 10_000_000) as f64 / 100.0;
    Ok((
        RecordData::Loc(LocData {
            version,
            size_meters,
            horizontal_precision_meters,
            vertical_precision_meters,
            latitude,
            longitude,
            altitude_meters,
        }),
        rdata.to_vec(),
    ))
}

fn decode_svcb(
    message: &[u8],
    offset: usize,
    rdata: &[u8],
    record_type: RecordType,
) -> Result<(RecordData, Vec<u8>), DomainError> {
    if rdata.len() < 2 {
        return Err(DomainError::InvalidData("truncated SVCB/HTTPS record".to_string()));
    }
    let priority = be_u16(rdata, 0);
    let (target, target_next) = decode_name(message, offset + 2)?;
    let target_wire = encode_name(&target)?;
    let mut uncompressed = Vec::new();
    uncompressed.extend_from_slice(&priority.to_be_bytes());
    uncompressed.extend_from_slice(&target_wire);

    let params_start = target_next - offset;
    let mut cursor = params_start;
    let mut params = Vec::new();
    while cursor < rdata.len() {
        if cursor + 4 > rdata.len() {
            return Err(DomainError::InvalidData("truncated SVCB parameter header".to_string()));
        }
        let key = be_u16(rdata, cursor);
        let value_len = be_u16(rdata, cursor + 2) as usize;
        let value_start = cursor + 4;
        let value_end = value_start + value_len;
        let value = rdata
            .get(value_start..value_end)
            .ok_or_else(|| DomainError::InvalidData("SVCB parameter value overruns rdata".to_string()))?;

        uncompressed.extend_from_slice(&key.to_be_bytes());
        uncompressed.extend_from_slice(&(value_len as u16).to_be_bytes());
        uncompressed.extend_from_slice(value);

        params.push(decode_svc_param(key, value)?);
        cursor = value_end;
    }

    let data = SvcbData {
        priority,
        target,
        params,
    };
    let record = if record_type == RecordType::HTTPS {
        RecordData::Https(data)
    } else {
        RecordData::Svcb(data)
    };
    Ok((record, uncompressed))
}

fn decode_svc_param(key: u16, value: &[u8]) -> Result<SvcParam, DomainError> {
    match key {
        1 => {
            // ALPN: sequence of length-prefixed protocol-id strings.
            let mut alpns = Vec::new();
            let mut cursor = 0usize;
            while cursor < value.len() {
                let len = value[cursor] as usize;
                let start = cursor + 1;
                let end = start + len;
                let proto = value
                    .get(start..end)
                    .ok_or_else(|| DomainError::InvalidData("ALPN entry overruns value".to_string()))?;
                alpns.push(String::from_utf8_lossy(proto).into_owned());
                cursor = end;
            }
            Ok(SvcParam::Alpn(alpns))
        }
        2 => Ok(SvcParam::NoDefaultAlpn),
        3 => {
            if value.len() != 2 {
                return Err(DomainError::InvalidData("port param must be 2 bytes".to_string()));
            }
            Ok(SvcParam::Port(be_u16(value, 0)))
        }
        4 => {
            if value.len() % 4 != 0 {
                return Err(DomainError::InvalidData("IPv4hint length must be a multiple of 4".to_string()));
            }
            let hints = value
                .chunks_exact(4)
                .map(|chunk| Ipv4Addr::new(chunk[0], chunk[1], chunk[2], chunk[3]))
                .collect();
            Ok(SvcParam::Ipv4Hint(hints))
        }
        5 => Ok(SvcParam::Ech(value.to_vec())),
        6 => {
            if value.len() % 16 != 0 {
                return Err(DomainError::InvalidData("IPv6hint length must be a multiple of 16".to_string()));
            }
            let hints = value
                .chunks_exact(16)
                .map(|chunk| {
                    let mut octets = [0u8; 16];
                    octets.copy_from_slice(chunk);
                    Ipv6Addr::from(octets)
                })
                .collect();
            Ok(SvcParam::Ipv6Hint(hints))
        }
        // Unknown SvcParamKey: logged and skipped by the caller, never an error (spec §9).
        other => Ok(SvcParam::Unknown {
            key: other,
            value: value.to_vec(),
        }),
    }
}

fn decode_ds(rdata: &[u8]) -> Result<(RecordData, Vec<u8>), DomainError> {
    if rdata.len() < 4 {
        return Err(DomainError::InvalidData("truncated DS record".to_string()));
    }
    Ok((
        RecordData::Ds(DsData {
            key_tag: be_u16(rdata, 0),
            algorithm: rdata[2],
            digest_type: rdata[3],
            digest: rdata[4..].to_vec(),
        }),
        rdata.to_vec(),
    ))
}

fn decode_rrsig(message: &[u8], offset: usize, rdata: &[u8]) -> Result<(RecordData, Vec<u8>), DomainError> {
    if rdata.len() < 18 {
        return Err(DomainError::InvalidData("truncated RRSIG record".to_string()));
    }
    let type_covered = RecordType::from_u16(be_u16(rdata, 0));
    let algorithm = rdata[2];
    let label_count = rdata[3];
    let original_ttl = be_u32(rdata, 4);
    let signature_expiration = be_u32(rdata, 8);
    let signature_inception = be_u32(rdata, 12);
    let key_tag = be_u16(rdata, 16);
    let (signer_name, signer_next) = decode_name(message, offset + 18)?;
    let signer_wire = encode_name(&signer_name)?;
    let sig_start = signer_next - offset;
    let signature = rdata
        .get(sig_start..)
        .ok_or_else(|| DomainError::InvalidData("RRSIG signature overruns rdata".to_string()))?
        .to_vec();

    let mut uncompressed = Vec::new();
    uncompressed.extend_from_slice(&rdata[0..18]);
    uncompressed.extend_from_slice(&signer_wire);
    uncompressed.extend_from_slice(&signature);

    Ok((
        RecordData::Rrsig(RrsigData {
            type_covered,
            algorithm,
            label_count,
            original_ttl,
            signature_expiration,
            signature_inception,
            key_tag,
            signer_name,
            signature,
        }),
        uncompressed,
    ))
}

fn decode_dnskey(rdata: &[u8]) -> Result<(RecordData, Vec<u8>), DomainError> {
    if rdata.len() < 4 {
        return Err(DomainError::InvalidData("truncated DNSKEY record".to_string()));
    }
    Ok((
        RecordData::Dnskey(DnskeyData {
            flags: be_u16(rdata, 0),
            protocol: rdata[2],
            algorithm: rdata[3],
            public_key: rdata[4..].to_vec(),
        }),
        rdata.to_vec(),
    ))
}

fn decode_nsec(message: &[u8], offset: usize, rdata: &[u8]) -> Result<(RecordData, Vec<u8>), DomainError> {
    let (next_domain_name, next) = decode_name(message, offset)?;
    let bitmap_start = next - offset;
    let type_bitmap = decode_type_bitmap(
        rdata
            .get(bitmap_start..)
            .ok_or_else(|| DomainError::InvalidData("NSEC bitmap overruns rdata".to_string()))?,
    )?;
    let mut uncompressed = encode_name(&next_domain_name)?;
    uncompressed.extend_from_slice(&rdata[bitmap_start..]);
    Ok((
        RecordData::Nsec(NsecData {
            next_domain_name,
            type_bitmap,
        }),
        uncompressed,
    ))
}

fn decode_nsec3(rdata: &[u8]) -> Result<(RecordData, Vec<u8>), DomainError> {
    if rdata.len() < 5 {
        return Err(DomainError::InvalidData("truncated NSEC3 record".to_string()));
    }
    let hash_algorithm = rdata[0];
    let flags = rdata[1];
    let iterations = be_u16(rdata, 2);
    let salt_len = rdata[4] as usize;
    let salt_start = 5;
    let salt_end = salt_start + salt_len;
    let salt = rdata
        .get(salt_start..salt_end)
        .ok_or_else(|| DomainError::InvalidData("NSEC3 salt overruns rdata".to_string()))?
        .to_vec();
    let hash_len = *rdata
        .get(salt_end)
        .ok_or_else(|| DomainError::InvalidData("truncated NSEC3 hash length".to_string()))? as usize;
    let hash_start = salt_end + 1;
    let hash_end = hash_start + hash_len;
    let next_hashed_owner_name = rdata
        .get(hash_start..hash_end)
        .ok_or_else(|| DomainError::InvalidData("NSEC3 hash overruns rdata".to_string()))?
        .to_vec();
    let type_bitmap = decode_type_bitmap(
        rdata
            .get(hash_end..)
            .ok_or_else(|| DomainError::InvalidData("NSEC3 bitmap overruns rdata".to_string()))?,
    )?;
    Ok((
        RecordData::Nsec3(Nsec3Data {
            hash_algorithm,
            flags,
            iterations,
            salt,
            next_hashed_owner_name,
            type_bitmap,
        }),
        rdata.to_vec(),
    ))
}

/// RFC 4034 §4.1.2 type-bitmap: a sequence of (window, bitmap-length, bitmap) windows.
fn decode_type_bitmap(bytes: &[u8]) -> Result<Vec<RecordType>, DomainError> {
    let mut types = Vec::new();
    let mut cursor = 0usize;
    while cursor < bytes.len() {
        if cursor + 2 > bytes.len() {
            return Err(DomainError::InvalidData("truncated NSEC type-bitmap window".to_string()));
        }
        let window = bytes[cursor] as u16;
        let block_len = bytes[cursor + 1] as usize;
        let block_start = cursor + 2;
        let block_end = block_start + block_len;
        let block = bytes
            .get(block_start..block_end)
            .ok_or_else(|| DomainError::InvalidData("NSEC type-bitmap block overruns data".to_string()))?;
        for (byte_index, byte) in block.iter().enumerate() {
            for bit in 0..8u16 {
                if byte & (0x80 >> bit) != 0 {
                    let type_code = window * 256 + byte_index as u16 * 8 + bit;
                    types.push(RecordType::from_u16(type_code));
                }
            }
        }
        cursor = block_end;
    }
    Ok(types)
}

/// RFC 4034 Appendix B key-tag algorithm, walked byte-by-byte over the DNSKEY RDATA.
pub fn dnskey_key_tag(dnskey_rdata: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    for (index, &byte) in dnskey_rdata.iter().enumerate() {
        if index % 2 == 0 {
            sum += (byte as u32) << 8;
        } else {
            sum += byte as u32;
        }
    }
    sum += (sum >> 16) & 0xffff;
    (sum & 0xffff) as u16
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

    #[test]
    fn decodes_a_record() {
        let message = [1, 2, 3, 4];
        let (data, uncompressed) = decode_rdata(&message, RecordType::A, 0, 4).unwrap();
        assert_eq!(data, RecordData::A(AData { address: Ipv4Addr::new(1, 2, 3, 4) }));
        assert_eq!(uncompressed, vec![1, 2, 3, 4]);
    }

    #[test]
    fn rejects_undersized_a_record() {
        let message = [1, 2, 3];
        assert!(decode_rdata(&message, RecordType::A, 0, 3).is_err());
    }

    #[test]
    fn key_tag_matches_known_root_ksk_value() {
        // KSK-2017 (tag 20326), flags=257 protocol=3 algorithm=8, public key from IANA.
        use base64::engine::general_purpose::STANDARD;
        use base64::Engine;
        let public_key = STANDARD
            .decode(concat!(
                "AwEAAaz/tAm8yTn4Mfeh5eyI96WSVexTBAvkMgJzkKTOiW1vkIbzxeF3",
                "+/4RgWOq7HrxRixHlFlExOLAJr5emLvN7SWXgnLh4+B5xQlNVz8Og8kv",
                "ArMtNROxVQuCaSnIDdD5LKyWbRd2n9WGe2R8PzgCmr3EgVLrjyBxWezF",
                "0jLHwVN8efS3rCj/EWgvIWgb9tarpVUDK/b58Da+sqqls3eNbuv7pr+e",
                "oZG+SrDK6nWeL3c6H5Apxz7LjVc1uTIdsIXxuOLYA4/ilBmSVIzuDWfd",
                "RUfhHdY6+cn8HFRm+2hM8AnXGXws9555KrUB5qihylGa8subX2Nn6UwN",
                "R1AkUTV74bU="
            ))
            .unwrap();
        let mut rdata = Vec::new();
        rdata.extend_from_slice(&257u16.to_be_bytes());
        rdata.push(3);
        rdata.push(8);
        rdata.extend_from_slice(&public_key);
        assert_eq!(dnskey_key_tag(&rdata), 20326);
    }

    #[test]
    fn decodes_txt_concatenating_substrings() {
        let rdata = [3, b'a', b'b', b'c', 2, b'd', b'e'];
        let (data, _) = decode_txt(&rdata).unwrap();
        assert_eq!(data, RecordData::Txt(TxtData { text: "abcde".to_string() }));
    }

    #[test]
    fn rejects_txt_overrunning_length() {
        let rdata = [10, b'a', b'b'];
        assert!(decode_txt(&rdata).is_err());
    }
}
