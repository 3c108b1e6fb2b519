//! Content-hash decoder.
//!
//! A content hash is `<unsigned-varint multicodec><value>`. The multicodec
//! selects a row of the [protocol table](crate::protocol) and the row's
//! [`PayloadEncoding`] says how `value` becomes a payload string.
//!
//! Decoding never fails outward: malformed input becomes
//! [`ContentHash::Invalid`], which callers handle like any other value.

use base64::engine::{general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::error::ContentHashError;
use crate::multiformat::{
    encode_cid_v1, encode_multihash, parse_cid, parse_multihash, read_varint, write_varint, DAG_PB,
    KECCAK_256, LIBP2P_KEY, SWARM_MANIFEST,
};
use crate::protocol::{PayloadEncoding, ProtocolDescriptor, ProtocolType};

/// Result of decoding a content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentHash {
    /// Nothing to decode (`0x` or no bytes at all).
    Empty,
    /// A supported protocol and its rendered payload.
    Decoded {
        protocol: ProtocolType,
        payload: String,
    },
    /// Well-framed but with a codec outside the protocol table.
    /// The payload is the original input as `0x` hex.
    Opaque { payload: String },
    /// Decoding failed.
    Invalid { error: ContentHashError },
}

impl ContentHash {
    /// Decode raw content-hash bytes.
    pub fn decode(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return ContentHash::Empty;
        }
        match decode_value(bytes) {
            Ok(Some((protocol, payload))) => ContentHash::Decoded { protocol, payload },
            Ok(None) => ContentHash::Opaque {
                payload: format!("0x{}", hex::encode(bytes)),
            },
            Err(error) => ContentHash::Invalid { error },
        }
    }

    /// Decode a `0x`-prefixed (or bare) hex string.
    pub fn decode_hex(text: &str) -> Self {
        let hex_str = text.strip_prefix("0x").unwrap_or(text);
        if hex_str.is_empty() {
            return ContentHash::Empty;
        }
        match hex::decode(hex_str) {
            Ok(bytes) => Self::decode(&bytes),
            Err(e) => ContentHash::Invalid {
                error: ContentHashError::InvalidHex {
                    reason: e.to_string(),
                },
            },
        }
    }

    /// Wrap an error marker returned by the upstream read in place of bytes.
    pub fn upstream_error(message: impl Into<String>) -> Self {
        ContentHash::Invalid {
            error: ContentHashError::Upstream(message.into()),
        }
    }

    /// Encode a payload string back into content-hash bytes.
    ///
    /// IPFS and IPNS payloads are written as CIDv1 (`dag-pb` / `libp2p-key`),
    /// Swarm digests as a `swarm-manifest` CID over a keccak-256 multihash.
    pub fn encode(protocol: ProtocolType, payload: &str) -> Result<Vec<u8>, ContentHashError> {
        let descriptor = protocol.descriptor();
        let invalid = |reason: String| ContentHashError::InvalidPayload {
            protocol: descriptor.scheme,
            reason,
        };

        let value = match descriptor.encoding {
            PayloadEncoding::Base58Multihash => {
                let multihash = bs58::decode(payload)
                    .into_vec()
                    .map_err(|e| invalid(e.to_string()))?;
                parse_multihash(&multihash, 0)?;
                let content_codec = if protocol == ProtocolType::Ipns {
                    LIBP2P_KEY
                } else {
                    DAG_PB
                };
                encode_cid_v1(content_codec, &multihash)
            }
            PayloadEncoding::HexDigest => {
                let digest = hex::decode(payload).map_err(|e| invalid(e.to_string()))?;
                if digest.is_empty() {
                    return Err(ContentHashError::EmptyPayload {
                        codec: descriptor.codec_name,
                    });
                }
                encode_cid_v1(SWARM_MANIFEST, &encode_multihash(KECCAK_256, &digest))
            }
            PayloadEncoding::Utf8 => payload.as_bytes().to_vec(),
            PayloadEncoding::Base64Url => URL_SAFE_NO_PAD
                .decode(payload)
                .map_err(|e| invalid(e.to_string()))?,
        };

        if value.is_empty() {
            return Err(ContentHashError::EmptyPayload {
                codec: descriptor.codec_name,
            });
        }

        let mut out = Vec::with_capacity(value.len() + 4);
        write_varint(descriptor.codec, &mut out);
        out.extend_from_slice(&value);
        Ok(out)
    }

    pub fn protocol_type(&self) -> Option<ProtocolType> {
        match self {
            ContentHash::Decoded { protocol, .. } => Some(*protocol),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&str> {
        match self {
            ContentHash::Decoded { payload, .. } | ContentHash::Opaque { payload } => Some(payload),
            _ => None,
        }
    }

    /// The failure message, if decoding failed.
    pub fn error(&self) -> Option<String> {
        match self {
            ContentHash::Invalid { error } => Some(error.to_string()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ContentHash::Empty)
    }
}

/// Returns `Ok(None)` when the codec is not in the protocol table.
fn decode_value(bytes: &[u8]) -> Result<Option<(ProtocolType, String)>, ContentHashError> {
    let (codec, n) = read_varint(bytes, 0)?;
    let Some(descriptor) = ProtocolDescriptor::by_codec(codec) else {
        return Ok(None);
    };

    let value = &bytes[n..];
    if value.is_empty() {
        return Err(ContentHashError::EmptyPayload {
            codec: descriptor.codec_name,
        });
    }

    let payload = match descriptor.encoding {
        PayloadEncoding::Base58Multihash => bs58::encode(parse_cid(value)?.bytes).into_string(),
        PayloadEncoding::HexDigest => hex::encode(parse_cid(value)?.digest),
        PayloadEncoding::Utf8 => std::str::from_utf8(value)
            .map_err(|_| ContentHashError::InvalidUtf8 {
                codec: descriptor.codec_name,
            })?
            .to_string(),
        PayloadEncoding::Base64Url => URL_SAFE_NO_PAD.encode(value),
    };

    Ok(Some((descriptor.protocol, payload)))
}

/// Match text already in scheme or path form.
///
/// Accepts `scheme://rest` for every supported scheme (anchored at the start),
/// then `/ipfs/rest` and `/ipns/rest` anywhere in the text. An empty `rest`
/// does not match.
pub fn match_protocol(text: &str) -> Option<(ProtocolType, String)> {
    if let Some((scheme, rest)) = text.split_once("://") {
        if let Some(descriptor) = ProtocolDescriptor::by_scheme(scheme) {
            return (!rest.is_empty()).then(|| (descriptor.protocol, rest.to_string()));
        }
    }

    for protocol in [ProtocolType::Ipfs, ProtocolType::Ipns] {
        let marker = format!("/{}/", protocol.as_str());
        if let Some(idx) = text.find(&marker) {
            let rest = &text[idx + marker.len()..];
            return (!rest.is_empty()).then(|| (protocol, rest.to_string()));
        }
    }
    None
}
