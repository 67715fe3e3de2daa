//! Directory entries and their metadata snapshots

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

/// File type bits of `st_mode`.
pub const S_IFMT: u32 = 0o170000;
pub const S_IFIFO: u32 = 0o010000;
pub const S_IFCHR: u32 = 0o020000;
pub const S_IFDIR: u32 = 0o040000;
pub const S_IFBLK: u32 = 0o060000;
pub const S_IFREG: u32 = 0o100000;
pub const S_IFLNK: u32 = 0o120000;
pub const S_IFSOCK: u32 = 0o140000;
/// BSD whiteout; never produced on Linux but still classified.
pub const S_IFWHT: u32 = 0o160000;

/// Seconds plus sub-second nanoseconds. Ordering compares both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    pub secs: i64,
    pub nanos: u32,
}

impl Timestamp {
    pub fn new(secs: i64, nanos: u32) -> Self {
        Self { secs, nanos }
    }
}

/// What kind of node a mode describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Regular,
    Directory,
    Symlink,
    CharDevice,
    BlockDevice,
    Fifo,
    Socket,
    Whiteout,
    Unknown,
}

impl FileKind {
    pub fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            S_IFREG => FileKind::Regular,
            S_IFDIR => FileKind::Directory,
            S_IFLNK => FileKind::Symlink,
            S_IFCHR => FileKind::CharDevice,
            S_IFBLK => FileKind::BlockDevice,
            S_IFIFO => FileKind::Fifo,
            S_IFSOCK => FileKind::Socket,
            S_IFWHT => FileKind::Whiteout,
            _ => FileKind::Unknown,
        }
    }
}

/// Metadata snapshot taken once per entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stat {
    pub ino: u64,
    pub mode: u32,
    pub nlink: u64,
    pub uid: u32,
    pub gid: u32,
    pub rdev: u64,
    /// Logical size in bytes.
    pub size: u64,
    /// Allocation in 512-byte units.
    pub blocks: u64,
    pub atime: Timestamp,
    pub mtime: Timestamp,
    pub ctime: Timestamp,
}

impl Stat {
    pub fn kind(&self) -> FileKind {
        FileKind::from_mode(self.mode)
    }

    pub fn is_dir(&self) -> bool {
        self.kind() == FileKind::Directory
    }

    pub fn is_symlink(&self) -> bool {
        self.kind() == FileKind::Symlink
    }

    /// Regular file with any execute bit set.
    pub fn is_executable(&self) -> bool {
        self.kind() == FileKind::Regular && self.mode & 0o111 != 0
    }

    pub fn is_device(&self) -> bool {
        matches!(self.kind(), FileKind::CharDevice | FileKind::BlockDevice)
    }

    /// `lstat(2)`: never follows a final symlink.
    pub fn lstat(path: &Path) -> io::Result<Self> {
        fs::symlink_metadata(path).map(|m| Self::from(&m))
    }

    /// `stat(2)`: follows symlinks.
    pub fn stat(path: &Path) -> io::Result<Self> {
        fs::metadata(path).map(|m| Self::from(&m))
    }
}

impl From<&fs::Metadata> for Stat {
    fn from(meta: &fs::Metadata) -> Self {
        Self {
            ino: meta.ino(),
            mode: meta.mode(),
            nlink: meta.nlink(),
            uid: meta.uid(),
            gid: meta.gid(),
            rdev: meta.rdev(),
            size: meta.size(),
            blocks: meta.blocks(),
            atime: Timestamp::new(meta.atime(), meta.atime_nsec().clamp(0, 999_999_999) as u32),
            mtime: Timestamp::new(meta.mtime(), meta.mtime_nsec().clamp(0, 999_999_999) as u32),
            ctime: Timestamp::new(meta.ctime(), meta.ctime_nsec().clamp(0, 999_999_999) as u32),
        }
    }
}

/// How the walk is visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular or special file.
    File,
    /// Directory, before its children.
    DirPre,
    /// Directory, after its children.
    DirPost,
    /// The `.` or `..` pseudo-entry.
    Dot,
    Symlink,
    /// Metadata lookup failed; `Entry::error` holds the cause.
    NoStat,
}

/// One filesystem node encountered during a walk.
#[derive(Debug)]
pub struct Entry {
    /// Final path component, or the whole argument for roots.
    pub name: OsString,
    /// Path from the traversal root.
    pub path: PathBuf,
    /// 0 for root arguments, 1 for direct children, and so on.
    pub depth: usize,
    pub kind: EntryKind,
    pub stat: Option<Stat>,
    pub error: Option<io::Error>,
}

impl Entry {
    /// Classify a node from its metadata lookup.
    pub fn new(name: OsString, path: PathBuf, depth: usize, stat: io::Result<Stat>) -> Self {
        match stat {
            Ok(stat) => {
                let kind = match stat.kind() {
                    FileKind::Directory => EntryKind::DirPre,
                    FileKind::Symlink => EntryKind::Symlink,
                    _ => EntryKind::File,
                };
                Self {
                    name,
                    path,
                    depth,
                    kind,
                    stat: Some(stat),
                    error: None,
                }
            }
            Err(e) => Self {
                name,
                path,
                depth,
                kind: EntryKind::NoStat,
                stat: None,
                error: Some(e),
            },
        }
    }

    /// The `.` or `..` entry inside `dir`.
    pub fn dot(dir: &Path, name: &str, depth: usize) -> Self {
        let path = dir.join(name);
        let mut entry = Self::new(OsString::from(name), path.clone(), depth, Stat::stat(&path));
        if entry.kind != EntryKind::NoStat {
            entry.kind = EntryKind::Dot;
        }
        entry
    }

    pub fn name_bytes(&self) -> &[u8] {
        self.name.as_bytes()
    }

    pub fn is_dot(&self) -> bool {
        is_dot_name(&self.name)
    }

    pub fn size(&self) -> u64 {
        self.stat.map_or(0, |s| s.size)
    }
}

/// `.` or `..`.
pub fn is_dot_name(name: &OsStr) -> bool {
    matches!(name.as_bytes(), b"." | b"..")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    #[test]
    fn test_file_kind_from_mode() {
        assert_eq!(FileKind::from_mode(0o100644), FileKind::Regular);
        assert_eq!(FileKind::from_mode(0o040755), FileKind::Directory);
        assert_eq!(FileKind::from_mode(0o120777), FileKind::Symlink);
        assert_eq!(FileKind::from_mode(0o020666), FileKind::CharDevice);
        assert_eq!(FileKind::from_mode(0o060660), FileKind::BlockDevice);
        assert_eq!(FileKind::from_mode(0o010644), FileKind::Fifo);
        assert_eq!(FileKind::from_mode(0o140755), FileKind::Socket);
        assert_eq!(FileKind::from_mode(0o160000), FileKind::Whiteout);
    }

    #[test]
    fn test_timestamp_orders_by_nanos_within_second() {
        let a = Timestamp::new(100, 5);
        let b = Timestamp::new(100, 900);
        let c = Timestamp::new(101, 0);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_executable_only_for_regular_files() {
        let exe = Stat {
            mode: 0o100755,
            ..Default::default()
        };
        let dir = Stat {
            mode: 0o040755,
            ..Default::default()
        };
        assert!(exe.is_executable());
        assert!(!dir.is_executable());
    }

    #[test]
    fn test_entry_classification_uses_lstat() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("file"), "x").unwrap();
        symlink("file", dir.path().join("link")).unwrap();

        let link = dir.path().join("link");
        let entry = Entry::new("link".into(), link.clone(), 1, Stat::lstat(&link));
        assert_eq!(entry.kind, EntryKind::Symlink);

        let sub = dir.path().to_path_buf();
        let entry = Entry::new("d".into(), sub.clone(), 0, Stat::lstat(&sub));
        assert_eq!(entry.kind, EntryKind::DirPre);
    }

    #[test]
    fn test_missing_entry_keeps_error() {
        let entry = Entry::new(
            "gone".into(),
            PathBuf::from("/definitely/not/here"),
            1,
            Stat::lstat(Path::new("/definitely/not/here")),
        );
        assert_eq!(entry.kind, EntryKind::NoStat);
        assert!(entry.stat.is_none());
        assert!(entry.error.is_some());
    }

    #[test]
    fn test_dot_entries() {
        let dir = TempDir::new().unwrap();
        let dot = Entry::dot(dir.path(), ".", 1);
        let dotdot = Entry::dot(dir.path(), "..", 1);
        assert_eq!(dot.kind, EntryKind::Dot);
        assert_eq!(dotdot.kind, EntryKind::Dot);
        assert!(dot.is_dot());
        assert!(is_dot_name(OsStr::new("..")));
        assert!(!is_dot_name(OsStr::new(".hidden")));
    }
}
