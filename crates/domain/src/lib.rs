//! Wire-independent data model for dnskit: messages, answers, record data, DNSSEC
//! result shapes, and transport configuration. No I/O and no wire codec live here;
//! see the `dnskit` crate for those.

pub mod answer;
pub mod dns_record;
pub mod dnssec;
pub mod errors;
pub mod message;
pub mod transport;

pub use answer::{Answer, ErrorRecord, RecordData};
pub use dns_record::{RecordCategory, RecordType};
pub use dnssec::{DNSSECResource, DNSSECResult};
pub use errors::{DnssecError, DomainError};
pub use message::{Message, MessageFlags, Question, ResponseCode};
pub use transport::{
    parse_server_address, rewrite_for_ptr, QueryOptions, ServerAddress, Transport,
    TransportOptions,
};
