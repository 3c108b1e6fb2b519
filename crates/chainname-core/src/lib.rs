//! chainname-core: the pure resolution engine of ChainName.
//!
//! # Overview
//!
//! ChainName turns ENS-style registry records on EVM chains into navigable
//! links. This crate holds everything that needs no I/O:
//!
//! - [`ContentHash`]: multicodec content-hash decoder (and encoder)
//! - [`resolve_link`] / [`LinkTarget`]: gateway link and canonical URI per protocol
//! - [`protocol`]: the one descriptor table shared by both of the above
//! - [`alias_to_key`] / [`build_link`]: text-record aliases and profile links
//! - [`namehash`]: ENS namehash
//! - [`ChainRegistry`] / [`NetworkSelector`]: static chain table and host routing

pub mod chain;
pub mod contenthash;
pub mod error;
pub mod link;
mod multiformat;
pub mod namehash;
pub mod network;
pub mod protocol;
pub mod text;

pub use chain::{ChainConfig, ChainRegistry};
pub use contenthash::{match_protocol, ContentHash};
pub use error::{ContentHashError, CoreError, UnknownProtocol};
pub use link::{content_hash_link, link_with_fallback, resolve_link, LinkTarget};
pub use namehash::{namehash, Node, RESOLVER_NAME};
pub use network::{FallbackPolicy, HostRoute, NetworkSelector};
pub use protocol::{ProtocolDescriptor, ProtocolType};
pub use text::{alias_to_key, build_link};
