//! Visibility filtering for dotfiles and the `.`/`..` pseudo-entries

use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;

use crate::entry::is_dot_name;

/// Which names a listing shows. The same predicate drives both the printed
/// rows and the directory `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    /// Hide every name starting with `.`.
    #[default]
    Default,
    /// Show dotfiles, but not `.` and `..`.
    AlmostAll,
    /// Show everything, including `.` and `..`.
    All,
}

impl Visibility {
    /// Check if a name should be listed.
    pub fn admits(&self, name: &OsStr) -> bool {
        match self {
            Visibility::All => true,
            Visibility::AlmostAll => !is_dot_name(name),
            Visibility::Default => !is_hidden(name),
        }
    }

    /// Whether the walk should synthesize `.` and `..` entries.
    pub fn sees_dots(&self) -> bool {
        matches!(self, Visibility::All)
    }
}

/// A name beginning with `.`.
pub fn is_hidden(name: &OsStr) -> bool {
    name.as_bytes().first() == Some(&b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hides_dotfiles() {
        let v = Visibility::Default;
        assert!(v.admits(OsStr::new("a.txt")));
        assert!(!v.admits(OsStr::new(".hidden")));
        assert!(!v.admits(OsStr::new(".")));
        assert!(!v.admits(OsStr::new("..")));
    }

    #[test]
    fn test_almost_all_excludes_dot_entries() {
        let v = Visibility::AlmostAll;
        assert!(v.admits(OsStr::new(".hidden")));
        assert!(v.admits(OsStr::new("..."))); // not a pseudo-entry
        assert!(!v.admits(OsStr::new(".")));
        assert!(!v.admits(OsStr::new("..")));
    }

    #[test]
    fn test_all_shows_everything() {
        let v = Visibility::All;
        for name in [".", "..", ".hidden", "plain"] {
            assert!(v.admits(OsStr::new(name)), "{} should be visible", name);
        }
        assert!(v.sees_dots());
        assert!(!Visibility::AlmostAll.sees_dots());
    }
}
