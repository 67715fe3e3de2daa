//! Directory tree walking logic
//!
//! - `Walker`: the depth-first primitive, with pre/post directory visits,
//!   pruning, and per-directory child sets
//! - `Lister`: drives a `Walker` to produce a listing into any
//!   `ListingOutput`

mod config;
mod filter;
mod traversal;
mod walker;

// Re-export public types
pub use config::{DirMode, Recursion, WalkerConfig};
pub use filter::{Visibility, is_hidden};
pub use traversal::{Lister, ListingOutput, ListingSummary};
pub use walker::Walker;
