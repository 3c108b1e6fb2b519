//! Error types for name resolution.

use chainname_core::CoreError;
use chainname_rpc::TransportError;
use thiserror::Error;

/// Errors from a resolution request.
///
/// Content-hash decode failures are not here: they are part of the returned
/// value (see [`chainname_core::ContentHash::Invalid`]).
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The RPC call failed: network, timeout, or a node-side error.
    #[error(transparent)]
    Rpc(#[from] TransportError),

    /// The node answered, but the return data did not decode.
    #[error("invalid {method} response: {reason}")]
    InvalidResponse { method: &'static str, reason: String },

    #[error("invalid contract address '{address}'")]
    InvalidAddress { address: String },

    /// The registry has no resolver for `resolver.eth`.
    #[error("no resolver registered for resolver.eth on chain {chain_id}")]
    NoResolver { chain_id: u64 },

    /// No transport is configured for the chain.
    #[error("no RPC transport configured for chain {chain_id}")]
    UnknownChain { chain_id: u64 },

    /// Bad name or unknown network.
    #[error(transparent)]
    Name(#[from] CoreError),

    #[error("ABI error: {0}")]
    Abi(String),
}

impl ResolveError {
    /// Returns `true` if the failure came from the chain or its RPC endpoint
    /// rather than from the request itself.
    pub fn is_rpc_failure(&self) -> bool {
        matches!(
            self,
            Self::Rpc(_) | Self::InvalidResponse { .. } | Self::NoResolver { .. }
        )
    }

    /// Returns `true` if no chain serves the requested host.
    pub fn is_unknown_network(&self) -> bool {
        matches!(self, Self::Name(CoreError::UnknownNetwork { .. }))
    }
}
