//! Cloning manual repositories.
//!
//! A clone is an opaque step that yields a temporary checkout plus the
//! repository's base name. The checkout directory is removed when the
//! [`Checkout`] is dropped.

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use gix::remote::fetch::Shallow;
use tempfile::TempDir;
use thiserror::Error;

use crate::log;

/// Error messages that indicate the remote wants credentials.
const AUTH_MARKERS: [&str; 4] = [
    "authentication",
    "credentials",
    "401",
    "could not read username",
];

/// Errors produced while cloning a repository.
#[derive(Debug, Error)]
pub enum CloneError {
    #[error("failed to create checkout directory")]
    Io(#[from] std::io::Error),

    #[error("repository `{url}` requires authentication")]
    AuthenticationRequired { url: String },

    #[error("failed to clone `{url}`")]
    Failed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CloneError {
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthenticationRequired { .. })
    }

    /// Classify a transport error, detecting credential requests.
    fn from_transport<E>(url: &str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        if mentions_authentication(&err) {
            Self::AuthenticationRequired {
                url: url.to_string(),
            }
        } else {
            Self::Failed {
                url: url.to_string(),
                source: Box::new(err),
            }
        }
    }
}

fn mentions_authentication(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        let message = e.to_string().to_ascii_lowercase();
        if AUTH_MARKERS.iter().any(|marker| message.contains(marker)) {
            return true;
        }
        current = e.source();
    }
    false
}

/// A checked-out repository on disk.
#[derive(Debug)]
pub struct Checkout {
    root: PathBuf,
    name: String,
    _dir: Option<TempDir>,
}

impl Checkout {
    /// Checkout living in a directory the caller keeps alive.
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            name: name.into(),
            _dir: None,
        }
    }

    /// Checkout owning its temporary directory.
    pub fn temporary(dir: TempDir, name: impl Into<String>) -> Self {
        Self {
            root: dir.path().to_path_buf(),
            name: name.into(),
            _dir: Some(dir),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Repository base name (last URL segment without `.git`).
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Something that can turn a git URL into a [`Checkout`].
pub trait Cloner {
    fn clone_repo(&self, url: &str, branch: Option<&str>) -> Result<Checkout, CloneError>;
}

/// Shallow clones through `gix`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitCloner;

impl Cloner for GitCloner {
    fn clone_repo(&self, url: &str, branch: Option<&str>) -> Result<Checkout, CloneError> {
        let dir = tempfile::Builder::new()
            .prefix("manual-server-git_")
            .tempdir()?;
        let interrupt = AtomicBool::new(false);

        let mut prepare = gix::prepare_clone(url, dir.path())
            .map_err(|e| CloneError::from_transport(url, e))?
            .with_shallow(Shallow::DepthAtRemote(NonZeroU32::MIN));

        if let Some(branch) = branch {
            prepare = prepare
                .with_ref_name(Some(branch))
                .map_err(|e| CloneError::from_transport(url, e))?;
        }

        let (mut checkout, _) = prepare
            .fetch_then_checkout(gix::progress::Discard, &interrupt)
            .map_err(|e| CloneError::from_transport(url, e))?;
        let (repo, _) = checkout
            .main_worktree(gix::progress::Discard, &interrupt)
            .map_err(|e| CloneError::from_transport(url, e))?;

        let head = repo
            .head_id()
            .map(|id| id.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        log!("git"; "cloned {} at {}", url, head);

        Ok(Checkout::temporary(dir, repo_name(url)))
    }
}

/// Repository base name from a git URL.
///
/// # Examples
/// ```ignore
/// assert_eq!(repo_name("https://github.com/org/sensor-x.git"), "sensor-x");
/// assert_eq!(repo_name("https://github.com/org/sensor-x/"), "sensor-x");
/// ```
pub fn repo_name(url: &str) -> String {
    let from_url = url::Url::parse(url).ok().and_then(|parsed| {
        parsed
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .map(str::to_string)
    });
    let base = from_url.unwrap_or_else(|| {
        let trimmed = url.trim_end_matches('/');
        trimmed
            .rsplit(&['/', ':'][..])
            .next()
            .unwrap_or(trimmed)
            .to_string()
    });
    base.strip_suffix(".git").unwrap_or(&base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_name() {
        assert_eq!(
            repo_name("https://github.com/energietransitie/sensor-x.git"),
            "sensor-x"
        );
        assert_eq!(repo_name("https://github.com/org/sensor-x"), "sensor-x");
        assert_eq!(repo_name("https://github.com/org/sensor-x/"), "sensor-x");
        assert_eq!(repo_name("git@github.com:org/sensor-y.git"), "sensor-y");
    }

    #[test]
    fn test_auth_detection_walks_source_chain() {
        #[derive(Debug, Error)]
        #[error("fetch failed")]
        struct Outer(#[source] std::io::Error);

        let err = Outer(std::io::Error::other("HTTP 401 Unauthorized"));
        assert!(CloneError::from_transport("https://x/y", err).is_auth());

        let err = Outer(std::io::Error::other("connection refused"));
        assert!(!CloneError::from_transport("https://x/y", err).is_auth());
    }

    #[test]
    fn test_checkout_new_keeps_root() {
        let checkout = Checkout::new("/tmp/somewhere", "repo");
        assert_eq!(checkout.root(), Path::new("/tmp/somewhere"));
        assert_eq!(checkout.name(), "repo");
    }
}
