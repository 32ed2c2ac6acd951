use anyhow::Result;
use log::debug;

use super::{
    hash::HashMethod,
    source::{Fallible, LeafCursor, LeafSource},
};

pub mod classic;
pub mod level;
pub mod stream;

pub use stream::StreamAccumulator;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeHashOptions {
    /// Stop after this many leaves, as if the source had ended there.
    pub leaf_limit: Option<u64>,
}

/// What the last [`StreamAccumulator`] run did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccumulatorStats {
    /// Leaves pulled from the source.
    pub leaves: u64,
    /// Calls to `hash_nodes`, always `leaves - 1` for a non-empty run.
    pub combines: u64,
    /// Height of the final tree (0 for a single leaf).
    pub height: u32,
}

/// Root over every leaf `source` yields, or `None` for an empty source.
pub fn compute_root<Method, S>(source: S) -> Option<Method::Digest>
where
    Method: HashMethod,
    S: LeafSource<Digest = Method::Digest>,
{
    StreamAccumulator::<Method>::new().compute_root(source)
}

/// Hash raw leaves with [`HashMethod::hash_leaf`] as they are pulled.
pub fn compute_root_from_data<Method, I>(leaves: I) -> Option<Method::Digest>
where
    Method: HashMethod,
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    compute_root::<Method, _>(
        leaves
            .into_iter()
            .map(|leaf| Method::hash_leaf(leaf.as_ref())),
    )
}

/// Root over a fallible leaf stream. The first error stops the run and is
/// returned instead of a root.
pub fn try_compute_root<Method, I, E>(leaves: I) -> Result<Option<Method::Digest>>
where
    Method: HashMethod,
    I: IntoIterator<Item = std::result::Result<Method::Digest, E>>,
    E: Into<anyhow::Error>,
{
    let mut cursor = LeafCursor::new(Fallible::new(leaves.into_iter()));
    let root = StreamAccumulator::<Method>::new().compute_root_from_cursor(&mut cursor);
    let consumed = cursor.consumed();

    match cursor.into_inner().take_error() {
        Some(err) => {
            let err: anyhow::Error = err.into();
            debug!("Leaf source failed after {} leaves: {}", consumed, err);
            Err(err.context(format!("leaf source failed after {consumed} leaves")))
        }
        None => Ok(root),
    }
}
