//! Content protocols and the descriptor table shared by every decode path.
//!
//! One row per protocol drives three consumers:
//! - the content-hash byte decoder (multicodec id → protocol)
//! - the path/URI matcher (scheme → protocol)
//! - the link resolver (protocol → gateway link and canonical URI)
//!
//! Adding a protocol means adding one `static` row and one enum variant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownProtocol;

/// The closed set of protocols a content hash can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolType {
    Ipfs,
    Ipns,
    Bzz,
    Onion,
    Onion3,
    Sia,
    Arweave,
}

impl ProtocolType {
    /// All protocol types, in table order.
    pub const ALL: [ProtocolType; 7] = [
        ProtocolType::Ipfs,
        ProtocolType::Ipns,
        ProtocolType::Bzz,
        ProtocolType::Onion,
        ProtocolType::Onion3,
        ProtocolType::Sia,
        ProtocolType::Arweave,
    ];

    /// The protocol tag, which is also the scheme accepted by the URI matcher.
    pub fn as_str(self) -> &'static str {
        self.descriptor().scheme
    }

    /// The descriptor row for this protocol.
    pub fn descriptor(self) -> &'static ProtocolDescriptor {
        match self {
            ProtocolType::Ipfs => &IPFS,
            ProtocolType::Ipns => &IPNS,
            ProtocolType::Bzz => &BZZ,
            ProtocolType::Onion => &ONION,
            ProtocolType::Onion3 => &ONION3,
            ProtocolType::Sia => &SIA,
            ProtocolType::Arweave => &ARWEAVE,
        }
    }
}

impl fmt::Display for ProtocolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProtocolType {
    type Err = UnknownProtocol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProtocolDescriptor::by_scheme(s)
            .map(|d| d.protocol)
            .ok_or_else(|| UnknownProtocol(s.to_string()))
    }
}

/// How the bytes after the multicodec prefix are rendered as a payload string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadEncoding {
    /// CID whose multihash is rendered in base58btc (`Qm…`).
    Base58Multihash,
    /// CID whose multihash digest is rendered as lower-case hex.
    HexDigest,
    /// Raw UTF-8 text.
    Utf8,
    /// URL-safe base64 without padding.
    Base64Url,
}

/// A single row of the protocol table.
#[derive(Debug)]
pub struct ProtocolDescriptor {
    pub protocol: ProtocolType,
    /// Scheme / protocol tag, e.g. `"ipfs"`.
    pub scheme: &'static str,
    /// Multicodec table name, e.g. `"ipfs-ns"`.
    pub codec_name: &'static str,
    /// Multicodec code written as the unsigned-varint prefix.
    pub codec: u64,
    pub encoding: PayloadEncoding,
    /// Gateway link template; `{payload}` is substituted.
    pub gateway: &'static str,
    /// Scheme of the canonical URI (`onion3` shares `onion`).
    pub uri_scheme: &'static str,
}

static IPFS: ProtocolDescriptor = ProtocolDescriptor {
    protocol: ProtocolType::Ipfs,
    scheme: "ipfs",
    codec_name: "ipfs-ns",
    codec: 0xe3,
    encoding: PayloadEncoding::Base58Multihash,
    gateway: "https://dweb.link/ipfs/{payload}",
    uri_scheme: "ipfs",
};

static IPNS: ProtocolDescriptor = ProtocolDescriptor {
    protocol: ProtocolType::Ipns,
    scheme: "ipns",
    codec_name: "ipns-ns",
    codec: 0xe5,
    encoding: PayloadEncoding::Base58Multihash,
    gateway: "https://dweb.link/ipns/{payload}",
    uri_scheme: "ipns",
};

static BZZ: ProtocolDescriptor = ProtocolDescriptor {
    protocol: ProtocolType::Bzz,
    scheme: "bzz",
    codec_name: "swarm-ns",
    codec: 0xe4,
    encoding: PayloadEncoding::HexDigest,
    gateway: "https://gateway.ethswarm.org/bzz/{payload}",
    uri_scheme: "bzz",
};

static ONION: ProtocolDescriptor = ProtocolDescriptor {
    protocol: ProtocolType::Onion,
    scheme: "onion",
    codec_name: "onion",
    codec: 0x01bc,
    encoding: PayloadEncoding::Utf8,
    gateway: "http://{payload}.onion",
    uri_scheme: "onion",
};

static ONION3: ProtocolDescriptor = ProtocolDescriptor {
    protocol: ProtocolType::Onion3,
    scheme: "onion3",
    codec_name: "onion3",
    codec: 0x01bd,
    encoding: PayloadEncoding::Utf8,
    gateway: "http://{payload}.onion",
    uri_scheme: "onion",
};

static SIA: ProtocolDescriptor = ProtocolDescriptor {
    protocol: ProtocolType::Sia,
    scheme: "sia",
    codec_name: "skynet-ns",
    codec: 0xb1_9910,
    encoding: PayloadEncoding::Base64Url,
    gateway: "https://siasky.net/{payload}",
    uri_scheme: "sia",
};

static ARWEAVE: ProtocolDescriptor = ProtocolDescriptor {
    protocol: ProtocolType::Arweave,
    scheme: "arweave",
    codec_name: "arweave-ns",
    codec: 0xb2_9910,
    encoding: PayloadEncoding::Base64Url,
    gateway: "https://arweave.net/{payload}",
    uri_scheme: "arweave",
};

/// The full protocol table.
pub static PROTOCOLS: [&ProtocolDescriptor; 7] =
    [&IPFS, &IPNS, &BZZ, &ONION, &ONION3, &SIA, &ARWEAVE];

impl ProtocolDescriptor {
    /// Look up a row by its multicodec code.
    pub fn by_codec(codec: u64) -> Option<&'static ProtocolDescriptor> {
        PROTOCOLS.iter().copied().find(|d| d.codec == codec)
    }

    /// Look up a row by its scheme / protocol tag. Exact, case-sensitive match.
    pub fn by_scheme(scheme: &str) -> Option<&'static ProtocolDescriptor> {
        PROTOCOLS.iter().copied().find(|d| d.scheme == scheme)
    }

    /// HTTP(S) gateway link for `payload`.
    pub fn external_link(&self, payload: &str) -> String {
        self.gateway.replace("{payload}", payload)
    }

    /// Protocol-scheme URI for `payload`.
    pub fn canonical_uri(&self, payload: &str) -> String {
        format!("{}://{payload}", self.uri_scheme)
    }
}
