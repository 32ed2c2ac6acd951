use log::trace;

use crate::domain::{
    hash::HashMethod,
    source::{LeafCursor, LeafSource},
};

/// Build the root of the next subtree of height `level`, pulling at most
/// `2^level` leaves from `source` left to right.
///
/// Returns `None` only when the source was already exhausted before the call.
/// If the source runs out inside the right half, the left half's root is
/// promoted unchanged.
pub fn build_subtree_root<Method, S>(
    level: u32,
    source: &mut LeafCursor<S>,
) -> Option<Method::Digest>
where
    Method: HashMethod,
    S: LeafSource<Digest = Method::Digest>,
{
    if level == 0 {
        return source.pull();
    }

    let left = build_subtree_root::<Method, S>(level - 1, source)?;
    match build_subtree_root::<Method, S>(level - 1, source) {
        Some(right) => {
            source.record_combine();
            Some(Method::hash_nodes(&left, &right))
        }
        None => {
            trace!("Promoting unpaired node at level {}", level - 1);
            Some(left)
        }
    }
}
