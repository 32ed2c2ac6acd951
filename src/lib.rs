//! Streaming Merkle root computation.
//!
//! Leaves are pulled one at a time from a [`LeafSource`] of unknown length and
//! folded into a single root while holding only O(log n) digests. The result
//! is the same root a two-pass build over the whole leaf level would give,
//! with an unpaired node promoted unchanged whenever a level has an odd count
//! (the RFC 6962 tree shape).
//!
//! ```
//! use rust_merkle_treehash::{compute_root, BracketNotation};
//!
//! let root = compute_root::<BracketNotation, _>((1..=5).map(|i| i.to_string()));
//! assert_eq!(root.as_deref(), Some("[[[1,2],[3,4]],5]"));
//! ```
#![deny(clippy::all)]

pub mod domain;

pub use domain::hash::{
    bracket::BracketNotation,
    sha256::{Sha256Normal, Sha256Rfc6962},
    to_hex, HashMethod,
};
pub use domain::source::{Cancellable, Fallible, LeafCursor, LeafSource};
pub use domain::tree::{
    classic, compute_root, compute_root_from_data, try_compute_root, AccumulatorStats,
    StreamAccumulator, TreeHashOptions,
};

/// Install `env_logger` as the `log` backend, configured from `RUST_LOG`.
/// Calling it again is a no-op.
pub fn init() {
    // A logger may already be installed by an earlier call.
    env_logger::builder().is_test(cfg!(test)).try_init().ok();
}
