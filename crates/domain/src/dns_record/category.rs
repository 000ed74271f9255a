use std::fmt;

/// Coarse grouping over `RecordType`, kept from the teacher's record classification
/// and trimmed to the types this codec actually decodes (spec §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordCategory {
    /// A, AAAA, CNAME, MX, TXT, PTR
    Basic,
    /// SRV, SOA, NS, LOC, SVCB, HTTPS
    Advanced,
    /// DS, DNSKEY, RRSIG, NSEC, NSEC3
    Dnssec,
    /// EDNS(0) OPT pseudo-record
    Protocol,
    /// Anything the codec does not special-case
    Legacy,
}

impl RecordCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordCategory::Basic => "basic",
            RecordCategory::Advanced => "advanced",
            RecordCategory::Dnssec => "dnssec",
            RecordCategory::Protocol => "protocol",
            RecordCategory::Legacy => "legacy",
        }
    }

    pub fn all() -> &'static [RecordCategory] {
        &[
            RecordCategory::Basic,
            RecordCategory::Advanced,
            RecordCategory::Dnssec,
            RecordCategory::Protocol,
            RecordCategory::Legacy,
        ]
    }
}

impl fmt::Display for RecordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorizes_dnssec_types() {
        use crate::RecordType;
        assert_eq!(RecordType::DNSKEY.category(), RecordCategory::Dnssec);
        assert_eq!(RecordType::A.category(), RecordCategory::Basic);
    }

    #[test]
    fn all_lists_every_variant() {
        assert_eq!(RecordCategory::all().len(), 5);
    }
}
