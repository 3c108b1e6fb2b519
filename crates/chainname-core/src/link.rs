//! Link resolver: protocol + payload → gateway link and canonical URI.

use serde::{Deserialize, Serialize};

use crate::contenthash::{match_protocol, ContentHash};
use crate::protocol::ProtocolType;

/// Where a decoded content hash points.
///
/// Both fields unset means the protocol has no gateway; that is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTarget {
    /// HTTP(S) link a browser can navigate to.
    pub external_link: Option<String>,
    /// Protocol-scheme form, e.g. `ipfs://…`.
    pub canonical_uri: Option<String>,
}

impl LinkTarget {
    /// `true` if there is a link to redirect to.
    pub fn is_navigable(&self) -> bool {
        self.external_link.is_some()
    }
}

/// Map a protocol and payload to its link target.
///
/// `None` stands for any protocol outside the supported set and yields an
/// empty target.
pub fn resolve_link(protocol: Option<ProtocolType>, payload: &str) -> LinkTarget {
    match protocol {
        Some(protocol) => {
            let descriptor = protocol.descriptor();
            LinkTarget {
                external_link: Some(descriptor.external_link(payload)),
                canonical_uri: Some(descriptor.canonical_uri(payload)),
            }
        }
        None => LinkTarget::default(),
    }
}

impl ContentHash {
    /// Link target of a decoded value. Empty unless a protocol was decoded.
    pub fn link(&self) -> LinkTarget {
        match self {
            ContentHash::Decoded { protocol, payload } => resolve_link(Some(*protocol), payload),
            _ => LinkTarget::default(),
        }
    }
}

/// Link target for an already-decoded value, falling back to the path/URI
/// matcher over `raw` when the bytes carried no supported protocol.
pub fn link_with_fallback(decoded: &ContentHash, raw: &[u8]) -> LinkTarget {
    if decoded.protocol_type().is_some() {
        return decoded.link();
    }
    std::str::from_utf8(raw)
        .ok()
        .and_then(match_protocol)
        .map(|(protocol, payload)| resolve_link(Some(protocol), &payload))
        .unwrap_or_default()
}

/// Decode raw resolver output and resolve it to a link target.
pub fn content_hash_link(raw: &[u8]) -> LinkTarget {
    link_with_fallback(&ContentHash::decode(raw), raw)
}
