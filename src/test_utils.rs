//! Test utilities for building temporary directory trees.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs;
use std::io;
use std::os::unix::fs::{PermissionsExt, symlink};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::error::LsError;
use crate::output::Line;
use crate::tree::ListingOutput;

/// A temporary directory tree for testing.
///
/// The tree is automatically cleaned up when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file. Creates parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Add a symlink at `path` pointing to `target`, which is stored as
    /// given and need not exist.
    pub fn add_symlink(&self, path: &str, target: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        symlink(target, &full_path).expect("Failed to create symlink");
        full_path
    }

    /// Remove all permissions from `dir`. Returns false when the directory
    /// is still readable afterwards, as it is for root.
    pub fn lock(&self, dir: &Path) -> bool {
        fs::set_permissions(dir, fs::Permissions::from_mode(0o000))
            .expect("Failed to chmod dir");
        if fs::read_dir(dir).is_ok() {
            self.unlock(dir);
            return false;
        }
        true
    }

    /// Make `dir` readable but not searchable, so its names can be listed
    /// while their metadata cannot be read. Returns false when metadata is
    /// still readable afterwards, as it is for root.
    pub fn seal(&self, dir: &Path) -> bool {
        let child = fs::read_dir(dir)
            .expect("Failed to read dir")
            .next()
            .expect("Sealed dir needs a child")
            .expect("Failed to read entry")
            .path();
        fs::set_permissions(dir, fs::Permissions::from_mode(0o444))
            .expect("Failed to chmod dir");
        if fs::symlink_metadata(&child).is_ok() {
            self.unlock(dir);
            return false;
        }
        true
    }

    pub fn unlock(&self, dir: &Path) {
        fs::set_permissions(dir, fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod dir");
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

/// A `ListingOutput` that records everything in memory.
///
/// Headers are stored with their trailing `:` and separators as empty
/// lines, so `lines` reads like the listing on a terminal.
#[derive(Debug, Default)]
pub struct CapturedOutput {
    pub lines: Vec<String>,
    pub warnings: Vec<String>,
    pub finished: bool,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ListingOutput for CapturedOutput {
    fn entry(&mut self, line: &Line) -> io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }

    fn header(&mut self, path: &[u8]) -> io::Result<()> {
        self.lines
            .push(format!("{}:", String::from_utf8_lossy(path)));
        Ok(())
    }

    fn total(&mut self, text: &str) -> io::Result<()> {
        self.lines.push(text.to_string());
        Ok(())
    }

    fn blank(&mut self) -> io::Result<()> {
        self.lines.push(String::new());
        Ok(())
    }

    fn warn(&mut self, err: &LsError) -> io::Result<()> {
        self.warnings.push(err.to_string());
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.finished = true;
        Ok(())
    }
}
