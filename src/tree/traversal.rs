//! Listing traversal shared by every output sink.
//!
//! Root arguments are split into plain files and directories; files are
//! listed first, then each directory as its own block. Inside the walk each
//! node is handled by kind and depth:
//!
//! - a directory at depth 0 opens a block: separator, header, total, and its
//!   visible children; it is then skipped unless the listing is recursive
//! - a directory below depth 0 is a new block under recursion when visible,
//!   and is skipped otherwise, so nothing beneath it is read
//! - a non-directory at depth 0 is a bare file argument and is rendered
//! - anything else was already rendered as part of its parent's block

use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use log::debug;

use crate::entry::{Entry, EntryKind, Stat};
use crate::error::LsError;
use crate::output::{Line, OutputConfig, Renderer, display_name};
use crate::size;

use super::config::{DirMode, WalkerConfig};
use super::walker::Walker;

/// Sink for everything a listing produces.
pub trait ListingOutput {
    fn entry(&mut self, line: &Line) -> io::Result<()>;

    /// A directory block header; `path` is already escaped.
    fn header(&mut self, path: &[u8]) -> io::Result<()>;

    fn total(&mut self, text: &str) -> io::Result<()>;

    /// Separator between blocks.
    fn blank(&mut self) -> io::Result<()>;

    /// A recoverable problem with one entry.
    fn warn(&mut self, err: &LsError) -> io::Result<()>;

    fn finish(&mut self) -> io::Result<()>;
}

/// Counts reported after a listing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListingSummary {
    /// Rows rendered.
    pub entries: usize,
    /// Directory blocks opened.
    pub directories: usize,
    /// Root arguments that could not be examined.
    pub failed_operands: usize,
}

impl ListingSummary {
    pub fn is_clean(&self) -> bool {
        self.failed_operands == 0
    }
}

/// Lists paths according to a fixed configuration.
pub struct Lister {
    config: WalkerConfig,
    renderer: Renderer,
}

impl Lister {
    pub fn new(config: WalkerConfig, output: OutputConfig) -> Self {
        Self {
            config,
            renderer: Renderer::new(output),
        }
    }

    /// List `paths` (the current directory when empty) into `out`.
    ///
    /// Per-entry problems are reported through `out.warn` and the listing
    /// continues. A directory that cannot be read, or a failing sink, stops
    /// the listing and is returned as the error; whatever was written before
    /// stays written.
    pub fn list<O: ListingOutput>(
        &mut self,
        paths: &[PathBuf],
        out: &mut O,
    ) -> Result<ListingSummary, LsError> {
        let default_root = [PathBuf::from(".")];
        let paths = if paths.is_empty() {
            &default_root[..]
        } else {
            paths
        };

        let mut pass = Pass {
            config: &self.config,
            renderer: &mut self.renderer,
            out,
            show_headers: paths.len() > 1 || self.config.is_recursive(),
            printed: false,
            summary: ListingSummary::default(),
        };

        let roots = pass.partition(paths)?;
        let mut walker =
            Walker::new(roots, self.config.ordering).with_dots(self.config.visibility.sees_dots());

        while let Some(entry) = walker.read() {
            let entry = entry?;
            pass.visit(&entry, &mut walker)?;
        }

        pass.out.finish()?;
        Ok(pass.summary)
    }
}

/// State of one `list` call.
struct Pass<'a, O: ListingOutput> {
    config: &'a WalkerConfig,
    renderer: &'a mut Renderer,
    out: &'a mut O,
    show_headers: bool,
    /// Whether any block or file row has been written yet.
    printed: bool,
    summary: ListingSummary,
}

impl<O: ListingOutput> Pass<'_, O> {
    /// Stat each root and order them: plain files first, then directories,
    /// each group under the active ordering.
    fn partition(&mut self, paths: &[PathBuf]) -> Result<Vec<Entry>, LsError> {
        let mut files = Vec::new();
        let mut dirs = Vec::new();

        for path in paths {
            let entry = match stat_root(path, self.config.follow_root_links) {
                Ok(entry) => entry,
                Err(source) => {
                    self.out.warn(&LsError::Operand {
                        path: path.clone(),
                        source,
                    })?;
                    self.summary.failed_operands += 1;
                    continue;
                }
            };
            if entry.kind == EntryKind::DirPre && self.config.dir_mode == DirMode::ListContents {
                dirs.push(entry);
            } else {
                files.push(entry);
            }
        }

        debug!("{} file roots, {} directory roots", files.len(), dirs.len());
        self.config.ordering.sort(&mut files);
        self.config.ordering.sort(&mut dirs);
        files.extend(dirs);
        Ok(files)
    }

    fn visit(&mut self, entry: &Entry, walker: &mut Walker) -> Result<(), LsError> {
        match (entry.kind, entry.depth) {
            (EntryKind::DirPre, 0) if self.config.dir_mode == DirMode::ListItself => {
                self.emit(entry)?;
                self.printed = true;
                walker.skip_subtree();
            }
            (EntryKind::DirPre, 0) => {
                self.enter(entry, walker)?;
                if !self.config.is_recursive() {
                    walker.skip_subtree();
                }
            }
            (EntryKind::DirPre, _) => {
                if self.config.is_recursive() && self.config.visibility.admits(&entry.name) {
                    self.enter(entry, walker)?;
                } else {
                    debug!("prune {}", entry.path.display());
                    walker.skip_subtree();
                }
            }
            (EntryKind::DirPost, _) => {}
            (_, 0) => {
                self.emit(entry)?;
                self.printed = true;
            }
            _ => {}
        }
        Ok(())
    }

    /// Open a directory block and list the directory's visible children.
    fn enter(&mut self, dir: &Entry, walker: &mut Walker) -> Result<(), LsError> {
        if self.show_headers && self.printed {
            self.out.blank()?;
        }
        if self.show_headers {
            let raw = self.renderer.config().raw_names;
            self.out
                .header(&display_name(dir.path.as_os_str().as_bytes(), raw))?;
        }

        let children = walker.children()?;

        let output = self.renderer.config();
        if output.shows_total() {
            // the rows below report unreadable children themselves
            let total =
                size::directory_total(&dir.path, self.config.visibility, output.size_unit, |e| {
                    debug!("total skips {}", e)
                })?;
            let text = self.renderer.total_line(total);
            self.out.total(&text)?;
        }

        let visibility = self.config.visibility;
        for child in children.iter().filter(|c| visibility.admits(&c.name)) {
            self.emit(child)?;
        }

        self.printed = true;
        self.summary.directories += 1;
        Ok(())
    }

    fn emit(&mut self, entry: &Entry) -> Result<(), LsError> {
        let rendered = self.renderer.render(entry);
        for warning in &rendered.warnings {
            self.out.warn(warning)?;
        }
        if let Some(line) = rendered.line {
            self.out.entry(&line)?;
            self.summary.entries += 1;
        }
        Ok(())
    }
}

/// Metadata for a root argument. Symlinks are resolved when `follow` is
/// set, falling back to the link itself when it dangles.
fn stat_root(path: &Path, follow: bool) -> io::Result<Entry> {
    let stat = if follow {
        Stat::stat(path).or_else(|_| Stat::lstat(path))
    } else {
        Stat::lstat(path)
    }?;
    Ok(Entry::new(
        path.as_os_str().to_owned(),
        path.to_path_buf(),
        0,
        Ok(stat),
    ))
}
