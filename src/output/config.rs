//! Output configuration types

use crate::order::TimeField;
use crate::size::SizeUnit;

/// Configuration for rendering entries.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Long format (`-l`).
    pub long: bool,
    /// Inode number column (`-i`).
    pub inode: bool,
    /// Block count column (`-s`).
    pub blocks: bool,
    pub size_unit: SizeUnit,
    /// Never resolve uid/gid to names (`-n`).
    pub numeric_ids: bool,
    /// Type indicator after the name (`-F`).
    pub indicators: bool,
    /// Print names byte for byte (`-w`).
    pub raw_names: bool,
    /// Timestamp shown in long format.
    pub time_field: TimeField,
}

impl OutputConfig {
    /// Whether directory listings start with a `total` line.
    pub fn shows_total(&self) -> bool {
        self.long || self.blocks
    }
}
