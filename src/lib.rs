//! lsx - list directory contents, BSD style

pub mod entry;
pub mod error;
pub mod order;
pub mod output;
pub mod size;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use entry::{Entry, EntryKind, Stat, Timestamp};
pub use error::LsError;
pub use order::{Ordering, SortKey, TimeField};
pub use output::{OutputConfig, Renderer, StreamingFormatter};
pub use size::SizeUnit;
pub use tree::{DirMode, Lister, ListingOutput, ListingSummary, Recursion, Visibility, WalkerConfig};
