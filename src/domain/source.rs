use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, trace};

/// A lazy, ordered, single pass supply of leaf digests.
///
/// `None` signals the end of the sequence. It is not an error.
pub trait LeafSource {
    type Digest;

    fn next_leaf(&mut self) -> Option<Self::Digest>;
}

impl<I: Iterator> LeafSource for I {
    type Digest = I::Item;

    fn next_leaf(&mut self) -> Option<I::Item> {
        self.next()
    }
}

/// Exclusive cursor over a [`LeafSource`] shared by every builder call of one run.
///
/// Once the inner source reports the end, it is never polled again: values a
/// source might produce after its first `None` are ignored.
///
/// The cursor also tallies the combines done over the leaves it handed out.
pub struct LeafCursor<S: LeafSource> {
    source: S,
    consumed: u64,
    combines: u64,
    limit: Option<u64>,
    exhausted: bool,
}

impl<S: LeafSource> LeafCursor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            consumed: 0,
            combines: 0,
            limit: None,
            exhausted: false,
        }
    }

    /// Report the end after `limit` leaves, even if the source has more.
    pub fn with_limit(source: S, limit: Option<u64>) -> Self {
        Self {
            limit,
            ..Self::new(source)
        }
    }

    /// Pull one leaf.
    pub fn pull(&mut self) -> Option<S::Digest> {
        if self.exhausted {
            return None;
        }
        if self.limit.is_some_and(|limit| self.consumed >= limit) {
            debug!("Leaf limit of {} reached", self.consumed);
            self.exhausted = true;
            return None;
        }

        match self.source.next_leaf() {
            Some(leaf) => {
                self.consumed += 1;
                Some(leaf)
            }
            None => {
                trace!("Source exhausted after {} leaves", self.consumed);
                self.exhausted = true;
                None
            }
        }
    }

    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn combines(&self) -> u64 {
        self.combines
    }

    pub(crate) fn record_combine(&mut self) {
        self.combines += 1;
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

/// Reports the end of the sequence as soon as `cancelled` is set.
///
/// Cancelling truncates the leaf sequence, so the resulting root is the root
/// of the leaves seen so far.
pub struct Cancellable<S> {
    source: S,
    cancelled: Arc<AtomicBool>,
}

impl<S: LeafSource> Cancellable<S> {
    pub fn new(source: S, cancelled: Arc<AtomicBool>) -> Self {
        Self { source, cancelled }
    }
}

impl<S: LeafSource> LeafSource for Cancellable<S> {
    type Digest = S::Digest;

    fn next_leaf(&mut self) -> Option<S::Digest> {
        if self.cancelled.load(Ordering::Acquire) {
            return None;
        }
        self.source.next_leaf()
    }
}

/// Adapts a fallible iterator: the first `Err` ends the sequence and is kept
/// for the caller to inspect once the run finishes.
pub struct Fallible<I, E> {
    inner: I,
    error: Option<E>,
}

impl<I, E> Fallible<I, E> {
    pub fn new(inner: I) -> Self {
        Self { inner, error: None }
    }

    pub fn take_error(&mut self) -> Option<E> {
        self.error.take()
    }
}

impl<T, E, I: Iterator<Item = Result<T, E>>> LeafSource for Fallible<I, E> {
    type Digest = T;

    fn next_leaf(&mut self) -> Option<T> {
        if self.error.is_some() {
            return None;
        }
        match self.inner.next()? {
            Ok(leaf) => Some(leaf),
            Err(err) => {
                self.error = Some(err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cancellable, Fallible, LeafCursor, LeafSource};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Reports the end once, then keeps producing values.
    struct Flaky {
        calls: u32,
    }

    impl LeafSource for Flaky {
        type Digest = u32;

        fn next_leaf(&mut self) -> Option<u32> {
            self.calls += 1;
            if self.calls == 3 {
                None
            } else {
                Some(self.calls)
            }
        }
    }

    #[test]
    fn test_cursor_counts_and_latches() {
        let mut cursor = LeafCursor::new(vec![1, 2].into_iter());
        assert_eq!(cursor.pull(), Some(1));
        assert_eq!(cursor.pull(), Some(2));
        assert_eq!(cursor.pull(), None);
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.pull(), None, "Exhaustion must latch");
        assert_eq!(cursor.consumed(), 2);
    }

    #[test]
    fn test_cursor_never_polls_after_end() {
        let mut cursor = LeafCursor::new(Flaky { calls: 0 });
        assert_eq!(cursor.pull(), Some(1));
        assert_eq!(cursor.pull(), Some(2));
        assert_eq!(cursor.pull(), None);
        assert_eq!(cursor.pull(), None, "Values after the first end are ignored");
        assert_eq!(cursor.into_inner().calls, 3, "Source must not be polled again");
    }

    #[test]
    fn test_cursor_limit() {
        let mut cursor = LeafCursor::with_limit(1..=10, Some(3));
        let pulled: Vec<_> = std::iter::from_fn(|| cursor.pull()).collect();
        assert_eq!(pulled, vec![1, 2, 3]);
        assert_eq!(cursor.consumed(), 3);
    }

    #[test]
    fn test_cancellable_stops_on_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut source = Cancellable::new(1..=10, Arc::clone(&flag));
        assert_eq!(source.next_leaf(), Some(1));
        flag.store(true, Ordering::Release);
        assert_eq!(source.next_leaf(), None);
    }

    #[test]
    fn test_fallible_keeps_first_error() {
        let items: Vec<Result<u32, &str>> = vec![Ok(1), Err("bad"), Ok(3), Err("worse")];
        let mut source = Fallible::new(items.into_iter());
        assert_eq!(source.next_leaf(), Some(1));
        assert_eq!(source.next_leaf(), None);
        assert_eq!(source.next_leaf(), None, "Nothing is read past the first error");
        assert_eq!(source.take_error(), Some("bad"));
    }
}
