//! Configuration types for the traversal side of a listing

use crate::order::Ordering;

use super::filter::Visibility;

/// How far below each root the listing goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Recursion {
    /// One level per root.
    #[default]
    Shallow,
    /// Every visible subdirectory, unbounded.
    Recursive,
}

/// What a directory argument means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DirMode {
    #[default]
    ListContents,
    /// List the directory as a plain entry (`-d`).
    ListItself,
}

/// Configuration for tree walking behavior. Resolved once before any
/// traversal and never changed per level.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    pub visibility: Visibility,
    pub ordering: Ordering,
    pub recursion: Recursion,
    pub dir_mode: DirMode,
    /// Resolve symlinked root arguments to their targets.
    pub follow_root_links: bool,
}

impl WalkerConfig {
    pub fn is_recursive(&self) -> bool {
        self.recursion == Recursion::Recursive
    }
}
