//! Writable destination tree.
//!
//! [`OutputFs`] is the capability the build needs: make directories, write
//! files, remove subtrees. [`BuildSession`] owns one build's lifecycle on top
//! of it (open staging → populate → commit).

mod session;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use session::BuildSession;

/// Writable hierarchical filesystem, paths relative to its root.
pub trait OutputFs {
    /// Create a directory and all missing parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create or truncate a file, creating parent directories as needed.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Remove a file or directory subtree. Missing paths are not an error.
    fn remove_all(&self, path: &Path) -> io::Result<()>;
}

/// [`OutputFs`] rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct DirOutput {
    root: PathBuf,
}

impl DirOutput {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl OutputFs for DirOutput {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(self.root.join(path))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full, contents)
    }

    fn remove_all(&self, path: &Path) -> io::Result<()> {
        let full = self.root.join(path);
        let result = match fs::symlink_metadata(&full) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(&full),
            Ok(_) => fs::remove_file(&full),
            Err(e) => Err(e),
        };
        match result {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parents() {
        let temp = TempDir::new().unwrap();
        let out = DirOutput::new(temp.path());

        out.write(Path::new("a/b/c.txt"), b"hi").unwrap();
        assert_eq!(fs::read(temp.path().join("a/b/c.txt")).unwrap(), b"hi");
    }

    #[test]
    fn test_remove_all() {
        let temp = TempDir::new().unwrap();
        let out = DirOutput::new(temp.path());
        out.write(Path::new("x/y/z.txt"), b"z").unwrap();
        out.write(Path::new("file.txt"), b"f").unwrap();

        out.remove_all(Path::new("x")).unwrap();
        out.remove_all(Path::new("file.txt")).unwrap();
        out.remove_all(Path::new("never-existed")).unwrap();

        assert!(!temp.path().join("x").exists());
        assert!(!temp.path().join("file.txt").exists());
    }
}
