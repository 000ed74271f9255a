use crate::answer::Answer;
use crate::dns_record::RecordType;

/// A single outbound question: name, record type, class (spec §3).
///
/// `name` is expected absolute and dot-terminated by the time it reaches the codec;
/// reverse-lookup rewriting (PTR) happens at construction time in `transport::rewrite_for_ptr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: String,
    pub record_type: RecordType,
    pub class: u16,
}

impl Question {
    pub const CLASS_IN: u16 = 1;

    pub fn new(name: impl Into<String>, record_type: RecordType) -> Self {
        Question {
            name: name.into(),
            record_type,
            class: Self::CLASS_IN,
        }
    }
}

/// Header flag bits decoded from the two-byte flags field (RFC 1035 §4.1.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageFlags {
    pub response: bool,
    pub opcode: u8,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub authenticated_data: bool,
    pub checking_disabled: bool,
    pub response_code: u8,
}

impl MessageFlags {
    pub fn query_with_recursion() -> Self {
        MessageFlags {
            recursion_desired: true,
            ..Default::default()
        }
    }

    pub fn from_u16(bits: u16) -> Self {
        let hi = (bits >> 8) as u8;
        let lo = (bits & 0xff) as u8;
        MessageFlags {
            response: hi & 0x80 != 0,
            opcode: (hi >> 3) & 0x0f,
            authoritative: hi & 0x04 != 0,
            truncated: hi & 0x02 != 0,
            recursion_desired: hi & 0x01 != 0,
            recursion_available: lo & 0x80 != 0,
            authenticated_data: lo & 0x20 != 0,
            checking_disabled: lo & 0x10 != 0,
            response_code: lo & 0x0f,
        }
    }

    pub fn to_u16(self) -> u16 {
        let mut hi = 0u8;
        if self.response {
            hi |= 0x80;
        }
        hi |= (self.opcode & 0x0f) << 3;
        if self.authoritative {
            hi |= 0x04;
        }
        if self.truncated {
            hi |= 0x02;
        }
        if self.recursion_desired {
            hi |= 0x01;
        }
        let mut lo = 0u8;
        if self.recursion_available {
            lo |= 0x80;
        }
        if self.authenticated_data {
            lo |= 0x20;
        }
        if self.checking_disabled {
            lo |= 0x10;
        }
        lo |= self.response_code & 0x0f;
        ((hi as u16) << 8) | lo as u16
    }
}

/// DNS response codes the caller cares about; anything else is carried as a raw nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    NoError,
    FormatError,
    ServerFailure,
    NameError,
    NotImplemented,
    Refused,
    Other(u8),
}

impl ResponseCode {
    pub fn from_bits(bits: u8) -> Self {
        match bits {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormatError,
            2 => ResponseCode::ServerFailure,
            3 => ResponseCode::NameError,
            4 => ResponseCode::NotImplemented,
            5 => ResponseCode::Refused,
            other => ResponseCode::Other(other),
        }
    }
}

/// A DNS message, decoded or ready to encode (spec §3 / §4.1).
///
/// Immutable after construction: builders consume `self` and return a new value rather
/// than mutating in place, matching the "immutable after construction" invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: u16,
    pub flags: MessageFlags,
    pub questions: Vec<Question>,
    pub answers: Vec<Answer>,
    /// Authority and additional record counts observed on the wire; the codec parses
    /// those sections for structural validity but does not expose their contents.
    pub authority_count: u16,
    pub additional_count: u16,
}

impl Message {
    /// Builds an outbound query message for `question`, stamping the EDNS(0) OPT record
    /// semantics are applied by the codec at encode time, not stored here.
    pub fn query(id: u16, question: Question) -> Self {
        Message {
            id,
            flags: MessageFlags::query_with_recursion(),
            questions: vec![question],
            answers: Vec::new(),
            authority_count: 0,
            additional_count: 0,
        }
    }

    pub fn response_code(&self) -> ResponseCode {
        ResponseCode::from_bits(self.flags.response_code)
    }
}
