//! Block accounting and size formatting
//!
//! `st_blocks` counts 512-byte units. Reported numbers are converted to the
//! configured unit with ceiling division, so a partially used reporting
//! block always counts as one.

use std::fs;
use std::path::Path;

use log::debug;

use crate::entry::Stat;
use crate::error::LsError;
use crate::tree::Visibility;

/// Unit of `st_blocks`.
pub const NATIVE_BLOCK_SIZE: u64 = 512;
/// Upper bound accepted from `BLOCKSIZE`.
pub const MAX_BLOCK_SIZE: u64 = 1024 * 1024 * 1024;

/// How sizes and block counts are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    /// Blocks of the given byte size (a multiple of 512).
    Blocks(u64),
    /// 1024-byte blocks (`-k`).
    Kibibytes,
    /// Logical bytes, autoscaled for display (`-h`).
    Human,
}

impl Default for SizeUnit {
    fn default() -> Self {
        SizeUnit::Blocks(NATIVE_BLOCK_SIZE)
    }
}

/// Convert a count of 512-byte blocks to `unit`, rounding up.
/// `Human` has no block form and passes the count through.
pub fn scale_blocks(blocks: u64, unit: SizeUnit) -> u64 {
    let ratio = match unit {
        SizeUnit::Blocks(size) => (size / NATIVE_BLOCK_SIZE).max(1),
        SizeUnit::Kibibytes => 1024 / NATIVE_BLOCK_SIZE,
        SizeUnit::Human => return blocks,
    };
    blocks.div_ceil(ratio)
}

/// Per-file number for the block column: converted blocks, or logical
/// bytes in human mode.
pub fn file_block_size(stat: &Stat, unit: SizeUnit) -> u64 {
    match unit {
        SizeUnit::Human => stat.size,
        _ => scale_blocks(stat.blocks, unit),
    }
}

/// Sum the usage of the immediate children of `dir` that `visibility` lets
/// through.
///
/// Failing to open or read the directory is fatal. A child whose metadata
/// cannot be read is passed to `on_error` and contributes nothing.
pub fn directory_total<F>(
    dir: &Path,
    visibility: Visibility,
    unit: SizeUnit,
    mut on_error: F,
) -> Result<u64, LsError>
where
    F: FnMut(LsError),
{
    let reader = fs::read_dir(dir).map_err(|source| LsError::OpenDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut total = 0u64;
    let mut counted = 0usize;

    let mut add = |stat: &Stat| {
        total += match unit {
            SizeUnit::Human => stat.size,
            _ => stat.blocks,
        };
        counted += 1;
    };

    if visibility.sees_dots() {
        for dot in [".", ".."] {
            let path = dir.join(dot);
            match Stat::stat(&path) {
                Ok(stat) => add(&stat),
                Err(e) => on_error(LsError::Stat { path, source: e }),
            }
        }
    }

    for item in reader {
        let item = item.map_err(|source| LsError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = item.file_name();
        if !visibility.admits(&name) {
            continue;
        }
        let path = dir.join(&name);
        match Stat::lstat(&path) {
            Ok(stat) => add(&stat),
            Err(e) => on_error(LsError::Stat { path, source: e }),
        }
    }

    debug!(
        "total for {}: {} raw over {} entries",
        dir.display(),
        total,
        counted
    );

    Ok(match unit {
        SizeUnit::Human => total,
        _ => scale_blocks(total, unit),
    })
}

/// Format a total or block column value.
pub fn format_amount(amount: u64, unit: SizeUnit) -> String {
    match unit {
        SizeUnit::Human => humanize(amount),
        _ => amount.to_string(),
    }
}

/// Format a byte count in at most four columns: `100B`, `1.5K`, `12K`,
/// `980M`. Scales by 1024; a single decimal is kept below ten units.
pub fn humanize(bytes: u64) -> String {
    const UNITS: [char; 7] = ['B', 'K', 'M', 'G', 'T', 'P', 'E'];

    if bytes < 1000 {
        return format!("{}B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 999.5 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if value < 9.95 {
        format!("{:.1}{}", value, UNITS[unit])
    } else {
        format!("{:.0}{}", value, UNITS[unit])
    }
}

/// Parse a `BLOCKSIZE` value: a number with an optional `K`, `M` or `G`
/// suffix. Returns the clamped size and a warning when the value was
/// unusable or out of range.
pub fn parse_block_size(value: &str) -> (u64, Option<String>) {
    let value = value.trim();
    let split = value
        .as_bytes()
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, suffix) = value.split_at(split);

    let multiplier = match suffix {
        "" => 1,
        "k" | "K" => 1024,
        "m" | "M" => 1024 * 1024,
        "g" | "G" => 1024 * 1024 * 1024,
        _ => {
            return (
                NATIVE_BLOCK_SIZE,
                Some(format!("{}: unknown blocksize", value)),
            );
        }
    };

    let number: u64 = match digits.parse() {
        Ok(n) => n,
        Err(_) => {
            return (
                NATIVE_BLOCK_SIZE,
                Some(format!("{}: unknown blocksize", value)),
            );
        }
    };

    let size = number.saturating_mul(multiplier);
    if size < NATIVE_BLOCK_SIZE {
        (NATIVE_BLOCK_SIZE, Some("minimum blocksize is 512".to_string()))
    } else if size > MAX_BLOCK_SIZE {
        (MAX_BLOCK_SIZE, Some("maximum blocksize is 1G".to_string()))
    } else {
        // Round down to a whole number of native blocks.
        (size - size % NATIVE_BLOCK_SIZE, None)
    }
}
