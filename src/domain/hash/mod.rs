use std::fmt::Debug;

pub trait HashMethod {
    /// Value produced for a leaf or an internal node.
    type Digest: Clone + PartialEq + Debug;

    /// Lift a raw leaf into a digest.
    fn hash_leaf(data: &[u8]) -> Self::Digest;

    /// Hash two child nodes together. Argument order is significant.
    fn hash_nodes(left: &Self::Digest, right: &Self::Digest) -> Self::Digest;
}

/// Render a byte digest as `0x`-prefixed lowercase hex.
pub fn to_hex(digest: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(digest))
}

pub mod bracket;
pub mod sha256;
