//! Walker - depth-first traversal primitive
//!
//! Yields every node once, and every directory twice: `DirPre` before its
//! children and `DirPost` after them. Children of one directory are read in
//! full, sorted, and held until visited, so memory is bounded by fan-out
//! along the current path rather than by the size of the tree.
//!
//! After a `DirPre` the caller may ask for its `children()` (read now and
//! reused for the descent) or call `skip_subtree()`, in which case nothing
//! below the directory is read and no `DirPost` is produced.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::trace;

use crate::entry::{Entry, EntryKind, Stat};
use crate::error::LsError;
use crate::order::Ordering;

/// What the walker remembers about a directory it has entered.
#[derive(Debug)]
struct DirMark {
    name: OsString,
    path: PathBuf,
    depth: usize,
    stat: Option<Stat>,
}

impl DirMark {
    fn from_entry(entry: &Entry) -> Self {
        Self {
            name: entry.name.clone(),
            path: entry.path.clone(),
            depth: entry.depth,
            stat: entry.stat,
        }
    }

    fn into_post_entry(self) -> Entry {
        Entry {
            name: self.name,
            path: self.path,
            depth: self.depth,
            kind: EntryKind::DirPost,
            stat: self.stat,
            error: None,
        }
    }
}

/// The directory most recently returned as `DirPre`.
#[derive(Debug)]
struct Pending {
    mark: DirMark,
    children: Option<Vec<Entry>>,
    skip: bool,
}

#[derive(Debug)]
struct Level {
    mark: DirMark,
    remaining: VecDeque<Entry>,
}

pub struct Walker {
    ordering: Ordering,
    see_dots: bool,
    roots: VecDeque<Entry>,
    stack: Vec<Level>,
    pending: Option<Pending>,
}

impl Walker {
    /// Walk `roots` in the order given. Roots are not re-sorted.
    pub fn new(roots: Vec<Entry>, ordering: Ordering) -> Self {
        Self {
            ordering,
            see_dots: false,
            roots: roots.into(),
            stack: Vec::new(),
            pending: None,
        }
    }

    /// Include `.` and `..` among each directory's children.
    pub fn with_dots(mut self, see_dots: bool) -> Self {
        self.see_dots = see_dots;
        self
    }

    /// Next node of the walk. A directory that cannot be opened or read
    /// surfaces as an error; the walk should not be continued after one.
    pub fn read(&mut self) -> Option<Result<Entry, LsError>> {
        if let Some(pending) = self.pending.take() {
            if pending.skip {
                trace!("skip {}", pending.mark.path.display());
            } else {
                let children = match pending.children {
                    Some(children) => children,
                    None => match read_level(
                        &pending.mark.path,
                        pending.mark.depth + 1,
                        self.see_dots,
                        self.ordering,
                    ) {
                        Ok(children) => children,
                        Err(e) => return Some(Err(e)),
                    },
                };
                trace!("descend {}", pending.mark.path.display());
                self.stack.push(Level {
                    mark: pending.mark,
                    remaining: children.into(),
                });
            }
        }

        let next = self
            .stack
            .last_mut()
            .and_then(|level| level.remaining.pop_front());
        if let Some(entry) = next {
            return Some(Ok(self.visit(entry)));
        }

        if let Some(level) = self.stack.pop() {
            return Some(Ok(level.mark.into_post_entry()));
        }

        let root = self.roots.pop_front()?;
        Some(Ok(self.visit(root)))
    }

    /// Children of the directory just returned as `DirPre`, sorted. Empty if
    /// the last node was not a directory about to be entered.
    pub fn children(&mut self) -> Result<&[Entry], LsError> {
        let Some(pending) = self.pending.as_mut() else {
            return Ok(&[]);
        };
        if pending.children.is_none() {
            pending.children = Some(read_level(
                &pending.mark.path,
                pending.mark.depth + 1,
                self.see_dots,
                self.ordering,
            )?);
        }
        Ok(pending.children.as_deref().unwrap_or_default())
    }

    /// Do not descend into the directory just returned as `DirPre`.
    pub fn skip_subtree(&mut self) {
        if let Some(pending) = self.pending.as_mut() {
            pending.skip = true;
            pending.children = None;
        }
    }

    fn visit(&mut self, entry: Entry) -> Entry {
        if entry.kind == EntryKind::DirPre {
            self.pending = Some(Pending {
                mark: DirMark::from_entry(&entry),
                children: None,
                skip: false,
            });
        }
        entry
    }
}

/// Read one directory's children with their `lstat` metadata. The handle is
/// closed before returning, on every path.
fn read_level(
    dir: &Path,
    depth: usize,
    see_dots: bool,
    ordering: Ordering,
) -> Result<Vec<Entry>, LsError> {
    let reader = fs::read_dir(dir).map_err(|source| LsError::OpenDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut children = Vec::new();
    if see_dots {
        children.push(Entry::dot(dir, ".", depth));
        children.push(Entry::dot(dir, "..", depth));
    }

    for item in reader {
        let item = item.map_err(|source| LsError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = item.file_name();
        let path = dir.join(&name);
        let stat = Stat::lstat(&path);
        children.push(Entry::new(name, path, depth, stat));
    }

    ordering.sort(&mut children);
    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    fn root(path: &Path) -> Entry {
        Entry::new(
            path.as_os_str().to_owned(),
            path.to_path_buf(),
            0,
            Stat::lstat(path),
        )
    }

    fn trace_walk(walker: &mut Walker) -> Vec<(String, EntryKind, usize)> {
        let mut out = Vec::new();
        while let Some(entry) = walker.read() {
            let entry = entry.unwrap();
            out.push((
                entry.name.to_string_lossy().into_owned(),
                entry.kind,
                entry.depth,
            ));
        }
        out
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b"), "b").unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a").join("inner"), "i").unwrap();
        fs::write(dir.path().join("c"), "c").unwrap();
        dir
    }

    #[test]
    fn test_preorder_and_postorder_visits() {
        let dir = fixture();
        let mut walker = Walker::new(vec![root(dir.path())], Ordering::name_asc());
        let visits = trace_walk(&mut walker);

        let shape: Vec<(&str, EntryKind, usize)> = visits[1..visits.len() - 1]
            .iter()
            .map(|(n, k, d)| (n.as_str(), *k, *d))
            .collect();
        assert_eq!(
            shape,
            vec![
                ("a", EntryKind::DirPre, 1),
                ("inner", EntryKind::File, 2),
                ("a", EntryKind::DirPost, 1),
                ("b", EntryKind::File, 1),
                ("c", EntryKind::File, 1),
            ]
        );
        assert_eq!(visits[0].1, EntryKind::DirPre);
        assert_eq!(visits[visits.len() - 1].1, EntryKind::DirPost);
    }

    #[test]
    fn test_skip_prunes_subtree() {
        let dir = fixture();
        let mut walker = Walker::new(vec![root(dir.path())], Ordering::name_asc());
        let mut names = Vec::new();
        while let Some(entry) = walker.read() {
            let entry = entry.unwrap();
            if entry.kind == EntryKind::DirPre && entry.depth == 1 {
                walker.skip_subtree();
            }
            names.push((entry.name.to_string_lossy().into_owned(), entry.kind));
        }
        assert!(!names.iter().any(|(n, _)| n == "inner"));
        // skipped directories get no post-order visit
        assert!(!names.contains(&("a".to_string(), EntryKind::DirPost)));
    }

    #[test]
    fn test_children_are_reused_for_descent() {
        let dir = fixture();
        let mut walker = Walker::new(vec![root(dir.path())], Ordering::name_asc());
        let first = walker.read().unwrap().unwrap();
        assert_eq!(first.kind, EntryKind::DirPre);

        let listed: Vec<String> = walker
            .children()
            .unwrap()
            .iter()
            .map(|e| e.name.to_string_lossy().into_owned())
            .collect();
        assert_eq!(listed, vec!["a", "b", "c"]);

        let next = walker.read().unwrap().unwrap();
        assert_eq!(next.name, "a");
    }

    #[test]
    fn test_children_empty_for_files() {
        let dir = fixture();
        let file = dir.path().join("b");
        let mut walker = Walker::new(vec![root(&file)], Ordering::name_asc());
        let entry = walker.read().unwrap().unwrap();
        assert_eq!(entry.kind, EntryKind::File);
        assert!(walker.children().unwrap().is_empty());
        assert!(walker.read().is_none());
    }

    #[test]
    fn test_dots_included_when_requested() {
        let dir = fixture();
        let mut walker =
            Walker::new(vec![root(dir.path())], Ordering::name_asc()).with_dots(true);
        walker.read().unwrap().unwrap();
        let kinds: Vec<(String, EntryKind)> = walker
            .children()
            .unwrap()
            .iter()
            .map(|e| (e.name.to_string_lossy().into_owned(), e.kind))
            .collect();
        assert_eq!(kinds[0], (".".to_string(), EntryKind::Dot));
        assert_eq!(kinds[1], ("..".to_string(), EntryKind::Dot));
        assert_eq!(kinds.len(), 5);
    }

    #[test]
    fn test_symlinked_directory_not_followed() {
        let dir = fixture();
        symlink("a", dir.path().join("link")).unwrap();
        let mut walker = Walker::new(vec![root(dir.path())], Ordering::name_asc());
        let visits = trace_walk(&mut walker);
        assert!(visits.contains(&("link".to_string(), EntryKind::Symlink, 1)));
        assert_eq!(visits.iter().filter(|(n, _, _)| n == "inner").count(), 1);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = fixture();
        let gone = dir.path().join("a");
        let entry = root(&gone);
        fs::remove_dir_all(&gone).unwrap();

        let mut walker = Walker::new(vec![entry], Ordering::name_asc());
        walker.read().unwrap().unwrap();
        let err = walker.read().unwrap().unwrap_err();
        assert!(matches!(err, LsError::OpenDir { .. }));
    }
}
