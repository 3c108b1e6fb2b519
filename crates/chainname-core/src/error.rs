//! Error types for the ChainName core.

use thiserror::Error;

/// Why a content hash could not be decoded.
///
/// Never returned as `Err` by the decoder; it is embedded in
/// [`ContentHash::Invalid`](crate::contenthash::ContentHash::Invalid).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentHashError {
    #[error("invalid hex: {reason}")]
    InvalidHex { reason: String },

    #[error("truncated varint at byte {offset}")]
    TruncatedVarint { offset: usize },

    #[error("varint overflow at byte {offset}")]
    VarintOverflow { offset: usize },

    #[error("empty payload for codec {codec}")]
    EmptyPayload { codec: &'static str },

    #[error("unsupported CID version {version}")]
    UnsupportedCidVersion { version: u64 },

    #[error("multihash digest length mismatch: declared {declared}, found {found}")]
    DigestLength { declared: usize, found: usize },

    #[error("payload for codec {codec} is not valid UTF-8")]
    InvalidUtf8 { codec: &'static str },

    #[error("cannot encode payload for {protocol}: {reason}")]
    InvalidPayload { protocol: &'static str, reason: String },

    /// An error marker handed over by the upstream read instead of bytes.
    #[error("{0}")]
    Upstream(String),
}

/// Errors from chain selection and name handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("no chain configured for host '{host}'")]
    UnknownNetwork { host: String },

    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("invalid chain table: {0}")]
    InvalidChainTable(String),
}

/// A protocol name outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown content protocol '{0}'")]
pub struct UnknownProtocol(pub String);
