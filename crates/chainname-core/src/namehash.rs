//! ENS namehash.
//!
//! ```text
//! namehash("")        = 0x00…00
//! namehash(label.rest) = keccak256(namehash(rest) ++ keccak256(label))
//! ```

use tiny_keccak::{Hasher, Keccak};

use crate::error::CoreError;

/// A 32-byte registry node.
pub type Node = [u8; 32];

/// Name whose resolver is looked up once per chain in the registry.
pub const RESOLVER_NAME: &str = "resolver.eth";

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// Compute the node of a dot-separated name.
///
/// Labels are lower-cased first, so `Alice.bch` and `alice.bch` share a
/// node. The empty name is the root node. Empty labels (`"a..b"`, `".eth"`)
/// are rejected.
pub fn namehash(name: &str) -> Result<Node, CoreError> {
    let mut node = [0u8; 32];
    if name.is_empty() {
        return Ok(node);
    }

    let mut buf = [0u8; 64];
    for label in name.rsplit('.') {
        if label.is_empty() {
            return Err(CoreError::InvalidName {
                name: name.to_string(),
                reason: "empty label".into(),
            });
        }
        buf[..32].copy_from_slice(&node);
        buf[32..].copy_from_slice(&keccak256(label.to_lowercase().as_bytes()));
        node = keccak256(&buf);
    }
    Ok(node)
}

/// `0x`-prefixed hex form of a node.
pub fn node_hex(node: &Node) -> String {
    format!("0x{}", hex::encode(node))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_hex(name: &str) -> String {
        node_hex(&namehash(name).unwrap())
    }

    #[test]
    fn keccak_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn root_is_zero() {
        assert_eq!(namehash("").unwrap(), [0u8; 32]);
    }

    #[test]
    fn eip137_vectors() {
        assert_eq!(
            hash_hex("eth"),
            "0x93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae"
        );
        assert_eq!(
            hash_hex("foo.eth"),
            "0xde9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f"
        );
    }

    #[test]
    fn resolver_eth() {
        assert_eq!(
            hash_hex(RESOLVER_NAME),
            "0xfdd5d5de6dd63db72bbc2d487944ba13bf775b50a80805fe6fcaba9b0fba88f5"
        );
    }

    #[test]
    fn bch_name() {
        assert_eq!(
            hash_hex("alice.bch"),
            "0xfc2731ecf67dbc11b93717b1df11221b9a3ba555b207377cffee51d974a9cc57"
        );
    }

    #[test]
    fn labels_are_case_insensitive() {
        assert_eq!(hash_hex("Alice.BCH"), hash_hex("alice.bch"));
        assert_eq!(hash_hex("ETH"), hash_hex("eth"));
    }

    #[test]
    fn empty_label_rejected() {
        assert!(matches!(
            namehash("alice..bch"),
            Err(CoreError::InvalidName { .. })
        ));
        assert!(namehash(".eth").is_err());
        assert!(namehash("eth.").is_err());
    }
}
