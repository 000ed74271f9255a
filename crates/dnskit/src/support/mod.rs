//! Thread-safe containers, a monotonic timer, socket/host helpers, and the ASN.1 DER
//! encoder used to reformat DNSSEC keys and signatures (spec §4.5).

pub mod asn1;
pub mod atomic;
pub mod sockaddr;
pub mod timer;

pub use atomic::{AtomicArray, AtomicBool, AtomicInt, AtomicMap, AtomicOnce};
pub use timer::Timer;
