//! chainname-resolver: on-chain name resolution for ChainName.
//!
//! Reads the registry and resolver contracts over JSON-RPC and turns the
//! records into [`Resolution`]s:
//!
//! - [`NameResolver`]: `resolve_root`, `resolve_field` and the lower-level reads
//! - [`ResolverAddressCache`]: resolver contract address per chain
//! - [`Network`] / [`Networks`]: chain config paired with its transport
//! - [`abi`]: calldata and return-data codec

pub mod abi;
pub mod cache;
pub mod error;
pub mod network;
pub mod outcome;
pub mod resolver;

pub use abi::{NameAbi, NameCall};
pub use cache::ResolverAddressCache;
pub use error::ResolveError;
pub use network::{Network, Networks};
pub use outcome::{Links, Resolution};
pub use resolver::{NameResolver, ResolverConfig};
