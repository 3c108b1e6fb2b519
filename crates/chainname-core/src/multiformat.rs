//! Unsigned-varint, multihash and CID framing used inside content hashes.

use crate::error::ContentHashError;

/// Longest unsigned varint accepted (63 bits of payload).
const MAX_VARINT_LEN: usize = 9;

/// `dag-pb` content codec, used when re-encoding IPFS payloads.
pub(crate) const DAG_PB: u64 = 0x70;
/// `libp2p-key` content codec, used when re-encoding IPNS payloads.
pub(crate) const LIBP2P_KEY: u64 = 0x72;
/// `swarm-manifest` content codec.
pub(crate) const SWARM_MANIFEST: u64 = 0xfa;
/// `keccak-256` multihash code.
pub(crate) const KECCAK_256: u64 = 0x1b;

/// Read an unsigned LEB128 varint from the start of `bytes`.
///
/// `offset` is the position of `bytes` within the whole input and is only
/// used for error messages. Returns the value and the number of bytes read.
pub(crate) fn read_varint(bytes: &[u8], offset: usize) -> Result<(u64, usize), ContentHashError> {
    let mut value = 0u64;
    for (i, &byte) in bytes.iter().enumerate() {
        if i == MAX_VARINT_LEN {
            return Err(ContentHashError::VarintOverflow { offset: offset + i });
        }
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(ContentHashError::TruncatedVarint {
        offset: offset + bytes.len(),
    })
}

pub(crate) fn write_varint(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// A multihash borrowed from a larger buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Multihash<'a> {
    /// Full multihash: code, length and digest.
    pub bytes: &'a [u8],
    pub digest: &'a [u8],
}

/// Parse a multihash that spans the whole of `bytes`.
pub(crate) fn parse_multihash(bytes: &[u8], offset: usize) -> Result<Multihash<'_>, ContentHashError> {
    let (_code, a) = read_varint(bytes, offset)?;
    let (declared, b) = read_varint(&bytes[a..], offset + a)?;
    let digest = &bytes[a + b..];
    if digest.len() as u64 != declared {
        return Err(ContentHashError::DigestLength {
            declared: declared as usize,
            found: digest.len(),
        });
    }
    Ok(Multihash { bytes, digest })
}

/// Parse a binary CID and return its multihash.
///
/// CIDv0 is a bare sha2-256 multihash. CIDv1 is
/// `<version=1><content codec><multihash>`.
pub(crate) fn parse_cid(bytes: &[u8]) -> Result<Multihash<'_>, ContentHashError> {
    if bytes.len() == 34 && bytes[0] == 0x12 && bytes[1] == 0x20 {
        return parse_multihash(bytes, 0);
    }
    let (version, n) = read_varint(bytes, 0)?;
    if version != 1 {
        return Err(ContentHashError::UnsupportedCidVersion { version });
    }
    let (_content_codec, m) = read_varint(&bytes[n..], n)?;
    parse_multihash(&bytes[n + m..], n + m)
}

pub(crate) fn encode_multihash(code: u64, digest: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(digest.len() + 4);
    write_varint(code, &mut out);
    write_varint(digest.len() as u64, &mut out);
    out.extend_from_slice(digest);
    out
}

pub(crate) fn encode_cid_v1(content_codec: u64, multihash: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(multihash.len() + 4);
    write_varint(1, &mut out);
    write_varint(content_codec, &mut out);
    out.extend_from_slice(multihash);
    out
}
