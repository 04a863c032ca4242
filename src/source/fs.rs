//! Read-only filesystem view over a source tree.
//!
//! All paths handed to a [`SourceFs`] are relative to the tree root and use
//! `/`-free components only; the empty path is the root itself.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::debug;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Read-only hierarchical filesystem.
pub trait SourceFs {
    /// List a directory, sorted by entry name.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>>;

    /// Read a whole file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Check whether a regular file exists at `path`.
    fn is_file(&self, path: &Path) -> bool;

    /// Check whether a directory exists at `path`.
    fn is_dir(&self, path: &Path) -> bool;
}

/// A [`SourceFs`] backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct DirFs {
    root: PathBuf,
}

impl DirFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn full(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl SourceFs for DirFs {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(self.full(path))? {
            let entry = entry?;
            let Ok(name) = entry.file_name().into_string() else {
                debug!("source"; "skipping non UTF-8 name in {}", path.display());
                continue;
            };
            // Follow symlinks so linked directories behave like real ones.
            let is_dir = fs::metadata(entry.path())
                .map(|m| m.is_dir())
                .unwrap_or(false);
            entries.push(FsEntry { name, is_dir });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(self.full(path))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.full(path).is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.full(path).is_dir()
    }
}
