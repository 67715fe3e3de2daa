//! Error taxonomy for listing operations

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LsError {
    // Per-entry
    #[error("stat: {}: {}", .path.display(), os_message(.source))]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("readlink: {}: {}", .path.display(), os_message(.source))]
    ReadLink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A symlink whose target cannot be reached.
    #[error("readlink: {} -> {}: {}", .path.display(), .target.display(), os_message(.source))]
    LinkTarget {
        path: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A root argument that could not be examined at all.
    #[error("stat: {}: {}", .path.display(), os_message(.source))]
    Operand {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // Traversal
    #[error("opendir: {}: {}", .path.display(), os_message(.source))]
    OpenDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("readdir: {}: {}", .path.display(), os_message(.source))]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // Sink
    #[error("write: {}", os_message(.0))]
    Output(#[from] io::Error),
}

impl LsError {
    /// Build a `Stat` error from a borrowed cause, copying it.
    pub fn stat(path: &Path, cause: &io::Error) -> Self {
        Self::Stat {
            path: path.to_path_buf(),
            source: copy_io_error(cause),
        }
    }

    /// Whether the listing can continue after this error.
    ///
    /// A missing or unreadable single entry is reported and skipped. A
    /// directory that cannot be opened or read, or a broken output stream,
    /// ends the invocation.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Stat { .. }
                | Self::ReadLink { .. }
                | Self::LinkTarget { .. }
                | Self::Operand { .. }
        )
    }
}

/// The system's description of an error, without the `(os error N)`
/// suffix `io::Error` adds.
pub fn os_message(err: &io::Error) -> String {
    let text = err.to_string();
    match err.raw_os_error() {
        Some(code) => text
            .strip_suffix(&format!(" (os error {})", code))
            .map(str::to_string)
            .unwrap_or(text),
        None => text,
    }
}

/// `io::Error` is not `Clone`; rebuild an equivalent one.
pub(crate) fn copy_io_error(err: &io::Error) -> io::Error {
    match err.raw_os_error() {
        Some(code) => io::Error::from_raw_os_error(code),
        None => io::Error::new(err.kind(), err.to_string()),
    }
}
