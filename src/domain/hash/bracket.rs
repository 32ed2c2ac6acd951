use itertools::Itertools;

use super::HashMethod;

/// Human readable "digest" that spells out the tree shape, e.g. `[[1,2],3]`.
/// Handy for debugging and for asserting the exact nesting of a root.
pub struct BracketNotation;
impl HashMethod for BracketNotation {
    type Digest = String;

    fn hash_leaf(data: &[u8]) -> String {
        String::from_utf8_lossy(data).into_owned()
    }

    fn hash_nodes(left: &String, right: &String) -> String {
        format!("[{}]", [left, right].iter().join(","))
    }
}
