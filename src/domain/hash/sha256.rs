use super::HashMethod;
use sha2::{digest::FixedOutput, Digest, Sha256};

const RFC6962_LEAF_PREFIX: u8 = 0x00;
const RFC6962_NODE_PREFIX: u8 = 0x01;

pub struct Sha256Normal;
impl HashMethod for Sha256Normal {
    type Digest = Vec<u8>;

    fn hash_leaf(data: &[u8]) -> Vec<u8> {
        // Double SHA-256 for leaf data
        let mut hasher = Sha256::new();
        hasher.update(data);
        let once = hasher.finalize_fixed();

        let mut hasher = Sha256::new();
        hasher.update(once);
        hasher.finalize_fixed().to_vec()
    }

    fn hash_nodes(left: &Vec<u8>, right: &Vec<u8>) -> Vec<u8> {
        // Single SHA-256 for internal nodes
        let mut hasher = Sha256::new();
        hasher.update(left);
        hasher.update(right);
        hasher.finalize_fixed().to_vec()
    }
}

/// Certificate Transparency style hashing: leaves and nodes are
/// domain separated by a one byte prefix.
pub struct Sha256Rfc6962;
impl HashMethod for Sha256Rfc6962 {
    type Digest = [u8; 32];

    fn hash_leaf(data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update([RFC6962_LEAF_PREFIX]);
        hasher.update(data);
        hasher.finalize_fixed().into()
    }

    fn hash_nodes(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update([RFC6962_NODE_PREFIX]);
        hasher.update(left);
        hasher.update(right);
        hasher.finalize_fixed().into()
    }
}
