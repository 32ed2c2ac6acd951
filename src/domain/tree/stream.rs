use log::{debug, info, trace};
use std::ops::ControlFlow;
use std::time::Instant;

use crate::domain::{
    hash::HashMethod,
    source::{LeafCursor, LeafSource},
};

use super::{level::build_subtree_root, AccumulatorStats, TreeHashOptions};

/// Folds an unknown-length leaf stream into a single root while holding one
/// pending digest at a time.
///
/// `pending` is the root of the largest complete subtree seen so far that has
/// not been combined with anything to its right. Each step builds the next
/// subtree of the same height and merges it in, so the tree grows one level
/// per step.
#[derive(Debug)]
pub struct StreamAccumulator<Method: HashMethod> {
    options: TreeHashOptions,
    pending: Option<Method::Digest>,
    level: u32,
    stats: AccumulatorStats,
}

impl<Method: HashMethod> Default for StreamAccumulator<Method> {
    fn default() -> Self {
        Self::with_options(TreeHashOptions::default())
    }
}

impl<Method: HashMethod> StreamAccumulator<Method> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TreeHashOptions) -> Self {
        Self {
            options,
            pending: None,
            level: 0,
            stats: AccumulatorStats::default(),
        }
    }

    /// Consume `source` and return the root of every leaf it produced, or
    /// `None` if it produced none.
    pub fn compute_root<S>(&mut self, source: S) -> Option<Method::Digest>
    where
        S: LeafSource<Digest = Method::Digest>,
    {
        let mut cursor = LeafCursor::with_limit(source, self.options.leaf_limit);
        self.compute_root_from_cursor(&mut cursor)
    }

    /// Like [`Self::compute_root`], leaving the cursor with the caller so the
    /// source can be recovered afterwards.
    pub fn compute_root_from_cursor<S>(
        &mut self,
        cursor: &mut LeafCursor<S>,
    ) -> Option<Method::Digest>
    where
        S: LeafSource<Digest = Method::Digest>,
    {
        let total_start = Instant::now();
        self.pending = None;
        self.level = 0;
        let consumed_before = cursor.consumed();
        let combines_before = cursor.combines();

        let root = loop {
            if let ControlFlow::Break(root) = self.fold(cursor) {
                break root;
            }
        };

        self.stats = AccumulatorStats {
            leaves: cursor.consumed() - consumed_before,
            combines: cursor.combines() - combines_before,
            height: self.level,
        };
        debug!(
            "Folded {} leaves with {} combines into a tree of height {}",
            self.stats.leaves, self.stats.combines, self.stats.height
        );
        info!("Total duration of compute_root: {:?}", total_start.elapsed());

        root
    }

    /// Statistics of the last completed run.
    pub fn stats(&self) -> AccumulatorStats {
        self.stats
    }

    /// One accumulation step. Breaks with the final root once the source is
    /// exhausted.
    fn fold<S>(&mut self, source: &mut LeafCursor<S>) -> ControlFlow<Option<Method::Digest>>
    where
        S: LeafSource<Digest = Method::Digest>,
    {
        let Some(pending) = self.pending.take() else {
            // A lone leaf is a complete subtree of height 0.
            return match build_subtree_root::<Method, S>(0, source) {
                Some(first) => {
                    self.pending = Some(first);
                    self.level = 0;
                    ControlFlow::Continue(())
                }
                None => ControlFlow::Break(None),
            };
        };

        match build_subtree_root::<Method, S>(self.level, source) {
            Some(next) => {
                trace!("Merging two subtrees of height {}", self.level);
                source.record_combine();
                self.pending = Some(Method::hash_nodes(&pending, &next));
                self.level += 1;
                ControlFlow::Continue(())
            }
            None => ControlFlow::Break(Some(pending)),
        }
    }
}
