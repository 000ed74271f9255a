//! Wire codec, multi-transport client, and DNSSEC chain-of-trust validator.
//!
//! [`dispatcher::Query`] is the entry point: it encodes a question, races it across one
//! or more server addresses over a chosen [`Transport`](dnskit_domain::Transport), and
//! can optionally run full DNSSEC authentication over the reply.

pub mod codec;
pub mod dispatcher;
pub mod dnssec;
pub mod support;
pub mod transport;

pub use dispatcher::Query;
pub use transport::validate_configuration;
