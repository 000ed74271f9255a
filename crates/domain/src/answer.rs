use std::net::{Ipv4Addr, Ipv6Addr};

use crate::dns_record::RecordType;
use crate::errors::DomainError;

/// One decoded (or to-be-encoded) resource record (spec §3).
///
/// `rdata` is the raw on-wire bytes as read; `uncompressed_rdata` is the canonical image
/// used for RRSIG signature input (§4.1: names inside rdata are decompressed and
/// re-encoded). For record types with no embedded name the two are identical.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub name: String,
    pub record_type: RecordType,
    pub class: u16,
    pub ttl: u32,
    pub rdata: Vec<u8>,
    uncompressed_rdata: Vec<u8>,
    pub data: RecordData,
}

impl Answer {
    pub fn new(
        name: String,
        record_type: RecordType,
        class: u16,
        ttl: u32,
        rdata: Vec<u8>,
        uncompressed_rdata: Vec<u8>,
        data: RecordData,
    ) -> Self {
        Answer {
            name,
            record_type,
            class,
            ttl,
            rdata,
            uncompressed_rdata,
            data,
        }
    }

    /// Canonical rdata bytes to use as RRSIG signing input; see spec §4.4 step 3.
    pub fn uncompressed_rdata(&self) -> &[u8] {
        &self.uncompressed_rdata
    }
}

/// Tagged variant over every record-data shape the codec understands (spec §3/§4.1).
///
/// A closed sum type instead of a downcast-on-use trait object: the `Error` case carries
/// a per-record decode failure so one malformed record never aborts the whole message.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordData {
    A(AData),
    Aaaa(AaaaData),
    Ns(NameData),
    Cname(NameData),
    Ptr(NameData),
    Soa(SoaData),
    Mx(MxData),
    Srv(SrvData),
    Txt(TxtData),
    Loc(LocData),
    Https(SvcbData),
    Svcb(SvcbData),
    Ds(DsData),
    Rrsig(RrsigData),
    Dnskey(DnskeyData),
    Nsec(NsecData),
    Nsec3(Nsec3Data),
    Error(ErrorRecord),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AData {
    pub address: Ipv4Addr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AaaaData {
    pub address: Ipv6Addr,
}

/// Shared shape for NS/CNAME/PTR, each of which is "one decompressed name".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameData {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoaData {
    pub primary_name_server: String,
    pub responsible_mailbox: String,
    pub serial: u32,
    pub refresh_seconds: u32,
    pub retry_seconds: u32,
    pub expire_seconds: u32,
    pub minimum_ttl: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxData {
    pub preference: u16,
    pub exchange: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvData {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxtData {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocData {
    pub version: u8,
    pub size_meters: f64,
    pub horizontal_precision_meters: f64,
    pub vertical_precision_meters: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_meters: f64,
}

/// One (key, value) SVCB/HTTPS parameter (spec §4.1's ALPN/port/IPv4hint/IPv6hint/ECH set).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvcParam {
    Alpn(Vec<String>),
    NoDefaultAlpn,
    Port(u16),
    Ipv4Hint(Vec<Ipv4Addr>),
    Ipv6Hint(Vec<Ipv6Addr>),
    Ech(Vec<u8>),
    /// Unknown key: logged and skipped per spec §9, never an error.
    Unknown { key: u16, value: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvcbData {
    pub priority: u16,
    pub target: String,
    pub params: Vec<SvcParam>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsData {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrsigData {
    pub type_covered: RecordType,
    pub algorithm: u8,
    pub label_count: u8,
    pub original_ttl: u32,
    pub signature_expiration: u32,
    pub signature_inception: u32,
    pub key_tag: u16,
    pub signer_name: String,
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnskeyData {
    pub flags: u16,
    pub protocol: u8,
    pub algorithm: u8,
    pub public_key: Vec<u8>,
}

impl DnskeyData {
    const ZONE_KEY_FLAG: u16 = 0x0100;
    const REVOKED_FLAG: u16 = 0x0010;
    const KSK_FLAG: u16 = 0x0001;

    pub fn is_zone_key(&self) -> bool {
        self.flags & Self::ZONE_KEY_FLAG != 0
    }

    pub fn is_revoked(&self) -> bool {
        self.flags & Self::REVOKED_FLAG != 0
    }

    pub fn is_key_signing_key(&self) -> bool {
        self.flags & Self::KSK_FLAG != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsecData {
    pub next_domain_name: String,
    pub type_bitmap: Vec<RecordType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nsec3Data {
    pub hash_algorithm: u8,
    pub flags: u8,
    pub iterations: u16,
    pub salt: Vec<u8>,
    pub next_hashed_owner_name: Vec<u8>,
    pub type_bitmap: Vec<RecordType>,
}

/// Carries a per-record decode failure without aborting the rest of the message
/// (spec §4.1 / §7: "a malformed single record demotes to an ErrorRecord").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub reason: String,
}

impl From<&DomainError> for ErrorRecord {
    fn from(err: &DomainError) -> Self {
        ErrorRecord {
            reason: err.to_string(),
        }
    }
}
