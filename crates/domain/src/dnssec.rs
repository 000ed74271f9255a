use crate::answer::Answer;
use crate::errors::DnssecError;

/// Everything collected for one zone on the path from a signer name to the root
/// (spec §3). The root zone carries no DS records.
#[derive(Debug, Clone, PartialEq)]
pub struct DNSSECResource {
    pub zone_name: String,
    pub dnskeys: Vec<Answer>,
    pub dnskey_rrsig: Option<Answer>,
    pub ds_records: Vec<Answer>,
    pub ds_rrsig: Option<Answer>,
}

impl DNSSECResource {
    pub fn new(zone_name: impl Into<String>) -> Self {
        DNSSECResource {
            zone_name: zone_name.into(),
            dnskeys: Vec::new(),
            dnskey_rrsig: None,
            ds_records: Vec::new(),
            ds_rrsig: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.zone_name == "."
    }
}

/// Outcome of a full DNSSEC authentication pass (spec §3/§4.4).
///
/// Signature and chain checks are independent and both always attempted; a partial
/// result (e.g. signature verified but chain untrusted) is a meaningful, final outcome,
/// never an error by itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DNSSECResult {
    pub signature_verified: bool,
    pub signature_error: Option<DnssecError>,
    pub chain_trusted: bool,
    pub chain_error: Option<DnssecError>,
    pub resources: Vec<DNSSECResource>,
}

impl DNSSECResult {
    pub fn new() -> Self {
        DNSSECResult {
            signature_verified: false,
            signature_error: None,
            chain_trusted: false,
            chain_error: None,
            resources: Vec::new(),
        }
    }
}

impl Default for DNSSECResult {
    fn default() -> Self {
        Self::new()
    }
}
