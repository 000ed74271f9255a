use thiserror::Error;

/// Transport and wire-codec error taxonomy (spec §7).
///
/// A transport-level error never triggers a retry inside the core; the dispatcher
/// fails over to other server addresses in parallel instead of retrying any one of
/// them (see `dnskit::dispatcher`).
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("connection error: {0}")]
    ConnectionError(String),

    #[error("timed out")]
    TimedOut,

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("empty response")]
    EmptyResponse,

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("incorrect type: {0}")]
    IncorrectType(String),

    #[error("missing data: {0}")]
    MissingData(String),

    #[error("excessive response size")]
    ExcessiveResponseSize,

    #[error("unsupported algorithm")]
    UnsupportedAlgorithm,

    #[error("invalid URL")]
    InvalidUrl,

    #[error("HTTP error: {0}")]
    HttpError(u16),

    #[error("invalid content type: {0}")]
    InvalidContentType(String),
}

/// DNSSEC-specific error taxonomy (spec §7).
///
/// Ordinary DNSSEC failures are surfaced inside `DNSSECResult` rather than thrown;
/// only fatal setup errors (resource collection timing out entirely) propagate as an
/// `Err` from `authenticate`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnssecError {
    #[error("no RRSIG records present")]
    NoSignatures,

    #[error("missing keys: {0}")]
    MissingKeys(String),

    #[error("untrusted root signing key")]
    UntrustedRootSigningKey,

    #[error("signature verification failed")]
    SignatureFailed,

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("bad signing key: {0}")]
    BadSigningKey(String),

    #[error("internal error: {0}")]
    InternalError(String),
}
