use anyhow::{anyhow, Result};
use log::{debug, info};
use rayon::prelude::*;
use std::time::Instant;

use crate::domain::hash::HashMethod;

/// Largest power of two strictly smaller than `n` (`n >= 2`).
fn split_point(n: usize) -> usize {
    1 << (usize::BITS - 1 - (n - 1).leading_zeros())
}

/// Build the root over `leaves` with the RFC 6962 split. Uses Rayon to join
/// left and right halves.
fn build_subtree<Method>(leaves: &[Method::Digest]) -> Method::Digest
where
    Method: HashMethod,
    Method::Digest: Send + Sync,
{
    if leaves.len() == 1 {
        return leaves[0].clone();
    }

    let (left, right) = leaves.split_at(split_point(leaves.len()));
    let (left_hash, right_hash) = rayon::join(
        || build_subtree::<Method>(left),
        || build_subtree::<Method>(right),
    );
    Method::hash_nodes(&left_hash, &right_hash)
}

/// Two-pass root over a fully buffered leaf level.
///
/// Produces the same root as the streaming accumulator for the same leaves.
pub fn root_from_leaves<Method>(leaves: Vec<Method::Digest>) -> Result<Method::Digest>
where
    Method: HashMethod,
    Method::Digest: Send + Sync,
{
    let total_start = Instant::now();
    if leaves.is_empty() {
        return Err(anyhow!("Leaves cannot be empty"));
    }

    let root = build_subtree::<Method>(&leaves);
    info!(
        "Total duration of root_from_leaves over {} leaves: {:?}",
        leaves.len(),
        total_start.elapsed()
    );
    Ok(root)
}

/// Hash raw leaves in parallel, then build the root.
pub fn from_leaves_data<Method>(leaves: Vec<Vec<u8>>) -> Result<Method::Digest>
where
    Method: HashMethod,
    Method::Digest: Send + Sync,
{
    let hash_start = Instant::now();
    let hashed_leaves: Vec<_> = leaves
        .par_iter()
        .map(|leaf| Method::hash_leaf(leaf))
        .collect();
    debug!("Hashing {} leaves took {:?}", hashed_leaves.len(), hash_start.elapsed());

    root_from_leaves::<Method>(hashed_leaves)
}

#[cfg(test)]
mod tests {
    use super::{from_leaves_data, root_from_leaves, split_point};
    use crate::domain::hash::{bracket::BracketNotation, sha256::Sha256Rfc6962, to_hex, HashMethod};

    #[test]
    fn test_split_point() {
        assert_eq!(split_point(2), 1);
        assert_eq!(split_point(3), 2);
        assert_eq!(split_point(4), 2);
        assert_eq!(split_point(5), 4);
        assert_eq!(split_point(8), 4);
        assert_eq!(split_point(9), 8);
    }

    #[test]
    fn test_empty_leaves_error() {
        let result = root_from_leaves::<BracketNotation>(vec![]);
        assert!(result.is_err(), "Building from empty leaves must return an error");

        let msg = result.err().unwrap().to_string();
        assert!(msg.contains("Leaves cannot be empty"), "got: {msg}");
    }

    #[test]
    fn test_classic_shapes() {
        let leaves = |n: u32| (1..=n).map(|i| i.to_string()).collect::<Vec<_>>();
        assert_eq!(root_from_leaves::<BracketNotation>(leaves(1)).unwrap(), "1");
        assert_eq!(root_from_leaves::<BracketNotation>(leaves(3)).unwrap(), "[[1,2],3]");
        assert_eq!(
            root_from_leaves::<BracketNotation>(leaves(7)).unwrap(),
            "[[[1,2],[3,4]],[[5,6],7]]"
        );
    }

    #[test]
    fn test_rfc6962_reference_root() {
        // Root of the eight entry test vector from the certificate-transparency project.
        let leaves: Vec<Vec<u8>> = vec![
            vec![],
            vec![0x00],
            vec![0x10],
            vec![0x20, 0x21],
            vec![0x30, 0x31],
            vec![0x40, 0x41, 0x42, 0x43],
            vec![0x50, 0x51, 0x52, 0x53, 0x54, 0x55, 0x56, 0x57],
            vec![
                0x60, 0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0x6a, 0x6b, 0x6c,
                0x6d, 0x6e, 0x6f,
            ],
        ];
        let root = from_leaves_data::<Sha256Rfc6962>(leaves).unwrap();
        assert_eq!(
            to_hex(root),
            "0x5dc9da79a70659a9ad559cb701ded9a2ab9d823aad2f4960cfe370eff4604328"
        );
    }

    #[test]
    fn test_single_leaf_is_its_hash() {
        let root = from_leaves_data::<Sha256Rfc6962>(vec![b"only_leaf".to_vec()]).unwrap();
        assert_eq!(root, Sha256Rfc6962::hash_leaf(b"only_leaf"));
    }
}
