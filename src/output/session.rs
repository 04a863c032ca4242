//! One build's write session.
//!
//! Output is written into a staging directory next to the destination
//! (`.<name>.staging`). `commit` swaps it into place; dropping an
//! uncommitted session deletes it, so a failed build never touches the
//! published tree.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{DirOutput, OutputFs};
use crate::compiler::BuildError;
use crate::debug;

#[derive(Debug)]
pub struct BuildSession {
    destination: PathBuf,
    staging: DirOutput,
    emitted: HashSet<PathBuf>,
    committed: bool,
}

impl BuildSession {
    /// Start a session for `destination`, clearing any stale staging tree.
    pub fn open(destination: &Path) -> io::Result<Self> {
        let staging = sibling(destination, "staging")?;
        let output = DirOutput::new(&staging);
        if staging.exists() {
            debug!("build"; "removing stale staging tree {}", staging.display());
            fs::remove_dir_all(&staging)?;
        }
        output.create_dir_all(Path::new(""))?;

        Ok(Self {
            destination: destination.to_path_buf(),
            staging: output,
            emitted: HashSet::new(),
            committed: false,
        })
    }

    pub fn staging_root(&self) -> &Path {
        self.staging.root()
    }

    /// Number of files written so far.
    pub fn emitted(&self) -> usize {
        self.emitted.len()
    }

    /// Write one output file. Writing the same path twice is a collision.
    pub fn write(&mut self, path: &Path, contents: &[u8]) -> Result<(), BuildError> {
        if !self.emitted.insert(path.to_path_buf()) {
            return Err(BuildError::Collision(path.to_path_buf()));
        }
        self.staging
            .write(path, contents)
            .map_err(|source| BuildError::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Create an output directory (for empty directories in copied trees).
    pub fn create_dir(&self, path: &Path) -> Result<(), BuildError> {
        self.staging
            .create_dir_all(path)
            .map_err(|source| BuildError::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Publish the staging tree at the destination.
    ///
    /// The previous tree is moved aside first and removed only after the
    /// new one is in place.
    pub fn commit(mut self) -> io::Result<PathBuf> {
        let previous = sibling(&self.destination, "old")?;
        if previous.exists() {
            fs::remove_dir_all(&previous)?;
        }

        let had_previous = self.destination.exists();
        if had_previous {
            fs::rename(&self.destination, &previous)?;
        }
        if let Err(e) = fs::rename(self.staging.root(), &self.destination) {
            if had_previous {
                fs::rename(&previous, &self.destination).ok();
            }
            return Err(e);
        }
        self.committed = true;

        if had_previous {
            fs::remove_dir_all(&previous)?;
        }
        Ok(self.destination.clone())
    }
}

impl Drop for BuildSession {
    fn drop(&mut self) {
        if !self.committed {
            self.staging.remove_all(Path::new("")).ok();
        }
    }
}

/// `parent/.<name>.<suffix>` for `parent/<name>`.
fn sibling(destination: &Path, suffix: &str) -> io::Result<PathBuf> {
    let name = destination
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("output path `{}` has no directory name", destination.display()),
            )
        })?;
    let parent = destination.parent().unwrap_or(Path::new(""));
    Ok(parent.join(format!(".{name}.{suffix}")))
}
