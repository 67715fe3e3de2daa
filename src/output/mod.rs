//! Rendering of entries as listing lines
//!
//! - Short form: `[inode ][blocks ]name[indicator]`
//! - Long form: `[inode ][blocks ]mode nlink owner group size time name[indicator][ -> target]`
//!
//! Fields are separated by exactly one space; the long line is the
//! external contract and is never column-aligned.

mod config;
mod mode;
mod owner;
mod streaming;
mod utils;

use std::fmt;
use std::fs;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

pub use config::OutputConfig;
pub use mode::{indicator, mode_string};
pub use owner::OwnerCache;
pub use streaming::{DIAGNOSTIC_PREFIX, StreamingFormatter, report};
pub use utils::{device_numbers, display_name, format_time};

use crate::entry::{Entry, FileKind, Stat};
use crate::error::LsError;
use crate::size::{self, SizeUnit};

/// Color class of a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStyle {
    Plain,
    Directory,
    Symlink,
    Executable,
    Special,
}

impl NameStyle {
    fn of(stat: &Stat) -> Self {
        match stat.kind() {
            FileKind::Directory => NameStyle::Directory,
            FileKind::Symlink => NameStyle::Symlink,
            FileKind::Regular if stat.is_executable() => NameStyle::Executable,
            FileKind::Regular => NameStyle::Plain,
            _ => NameStyle::Special,
        }
    }
}

/// One rendered listing row, split so a sink can color the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Everything before the name, including the separating space.
    pub head: String,
    pub name: Vec<u8>,
    pub style: NameStyle,
    /// Indicator and symlink target.
    pub tail: Vec<u8>,
}

impl Line {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.head.len() + self.name.len() + self.tail.len());
        out.extend_from_slice(self.head.as_bytes());
        out.extend_from_slice(&self.name);
        out.extend_from_slice(&self.tail);
        out
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.to_bytes()))
    }
}

/// Result of rendering one entry: at most one row plus any warnings raised
/// along the way.
#[derive(Debug, Default)]
pub struct Rendered {
    pub line: Option<Line>,
    pub warnings: Vec<LsError>,
}

pub struct Renderer {
    config: OutputConfig,
    owners: OwnerCache,
}

impl Renderer {
    pub fn new(config: OutputConfig) -> Self {
        Self {
            config,
            owners: OwnerCache::new(),
        }
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// Render an entry in the configured form. An entry without metadata
    /// produces only a warning; an unreadable symlink target produces a
    /// warning and a row without the arrow.
    pub fn render(&mut self, entry: &Entry) -> Rendered {
        let Some(stat) = entry.stat else {
            let warning = match &entry.error {
                Some(e) => LsError::stat(&entry.path, e),
                None => LsError::stat(
                    &entry.path,
                    &std::io::Error::from(std::io::ErrorKind::NotFound),
                ),
            };
            return Rendered {
                line: None,
                warnings: vec![warning],
            };
        };

        if !self.config.long {
            return Rendered {
                line: Some(self.render_short(entry, &stat)),
                warnings: Vec::new(),
            };
        }

        let mut warnings = Vec::new();
        let target = if stat.is_symlink() {
            match resolve_link(&entry.path) {
                Ok(target) => Some(target),
                Err(e) => {
                    warnings.push(e);
                    None
                }
            }
        } else {
            None
        };

        Rendered {
            line: Some(self.render_long(entry, &stat, target.as_deref())),
            warnings,
        }
    }

    /// `[inode ][blocks ]name[indicator]`
    pub fn render_short(&self, entry: &Entry, stat: &Stat) -> Line {
        Line {
            head: self.prefix_columns(stat),
            name: display_name(entry.name_bytes(), self.config.raw_names),
            style: NameStyle::of(stat),
            tail: self.indicator_bytes(stat),
        }
    }

    /// The long line. `link_target` is appended as ` -> target` for
    /// symlinks when known.
    pub fn render_long(&mut self, entry: &Entry, stat: &Stat, link_target: Option<&Path>) -> Line {
        let mut head = self.prefix_columns(stat);

        let (owner, group) = if self.config.numeric_ids {
            (stat.uid.to_string(), stat.gid.to_string())
        } else {
            (self.owners.user(stat.uid), self.owners.group(stat.gid))
        };

        let size = if stat.is_device() {
            let (major, minor) = device_numbers(stat.rdev);
            format!("{}, {}", major, minor)
        } else if self.config.size_unit == SizeUnit::Human {
            size::humanize(stat.size)
        } else {
            stat.size.to_string()
        };

        head.push_str(&format!(
            "{} {} {} {} {} {} ",
            mode_string(stat.mode),
            stat.nlink,
            owner,
            group,
            size,
            format_time(self.config.time_field.of(stat)),
        ));

        let mut tail = self.indicator_bytes(stat);
        if let (true, Some(target)) = (stat.is_symlink(), link_target) {
            tail.extend_from_slice(b" -> ");
            tail.extend(display_name(
                target.as_os_str().as_bytes(),
                self.config.raw_names,
            ));
        }

        Line {
            head,
            name: display_name(entry.name_bytes(), self.config.raw_names),
            style: NameStyle::of(stat),
            tail,
        }
    }

    /// Text of a directory's `total` line.
    pub fn total_line(&self, amount: u64) -> String {
        format!("total {}", size::format_amount(amount, self.config.size_unit))
    }

    fn prefix_columns(&self, stat: &Stat) -> String {
        let mut head = String::new();
        if self.config.inode {
            head.push_str(&format!("{} ", stat.ino));
        }
        if self.config.blocks {
            let amount = size::file_block_size(stat, self.config.size_unit);
            head.push_str(&size::format_amount(amount, self.config.size_unit));
            head.push(' ');
        }
        head
    }

    fn indicator_bytes(&self, stat: &Stat) -> Vec<u8> {
        match (self.config.indicators, indicator(stat)) {
            (true, Some(c)) => c.to_string().into_bytes(),
            _ => Vec::new(),
        }
    }
}

/// Read a symlink's target. A target that cannot be reached is an error
/// too, so dangling links are shown without an arrow.
pub fn resolve_link(path: &Path) -> Result<PathBuf, LsError> {
    let target = fs::read_link(path).map_err(|source| LsError::ReadLink {
        path: path.to_path_buf(),
        source,
    })?;
    match Stat::stat(path) {
        Ok(_) => Ok(target),
        Err(source) => Err(LsError::LinkTarget {
            path: path.to_path_buf(),
            target,
            source,
        }),
    }
}
