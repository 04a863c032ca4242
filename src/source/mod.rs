//! Manual sources and their destination path mapping.
//!
//! Three variants exist and they only differ in how a source path maps to a
//! path in the built site:
//!
//! | Variant       | Origin                       | Mapping                                   |
//! |---------------|------------------------------|-------------------------------------------|
//! | `Local`       | lab directory on disk        | identity                                  |
//! | `LabRepo`     | lab git repository           | identity                                  |
//! | `DeviceRepo`  | device firmware repository   | `docs/manuals/T/..` → `devices/R/T/manufacturer/..` |

pub mod fs;
pub mod git;

use std::fmt;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::core::MANUFACTURER_CAMPAIGN;
use fs::{DirFs, SourceFs};
use git::{CloneError, Cloner, Checkout};

/// Directory that holds manuals inside a device repository.
pub const DEVICE_MANUALS_DIR: [&str; 2] = ["docs", "manuals"];

/// Top-level directory device manuals are published under.
pub const DEVICES_DIR: &str = "devices";

/// Errors raised when a source path cannot be mapped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("`{}` does not follow the docs/manuals/<type>/... layout of device repository `{repo}`", path.display())]
    Structure { repo: String, path: PathBuf },

    #[error("`{}` escapes the source root", .0.display())]
    Escape(PathBuf),
}

/// Errors raised while opening a source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source directory `{}` does not exist", .0.display())]
    MissingDir(PathBuf),

    #[error(transparent)]
    Clone(#[from] CloneError),
}

/// Where the lab's manuals come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Local(PathBuf),
    Repository { url: String, branch: Option<String> },
}

impl SourceLocation {
    /// Pick the variant by URL prefix: `https://` means a git repository.
    pub fn parse(raw: &str, branch: Option<&str>) -> Self {
        if raw.starts_with("https://") {
            Self::Repository {
                url: raw.to_string(),
                branch: branch.filter(|b| !b.is_empty()).map(str::to_string),
            }
        } else {
            let expanded = shellexpand::tilde(raw).into_owned();
            Self::Local(PathBuf::from(expanded))
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "local directory {}", path.display()),
            Self::Repository { url, branch: None } => write!(f, "git repository {url}"),
            Self::Repository {
                url,
                branch: Some(branch),
            } => write!(f, "git repository {url} (branch {branch})"),
        }
    }
}

/// Source variant tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Local,
    LabRepo,
    DeviceRepo { repo_name: String },
}

/// Read-only tree of manual sources plus its destination mapping.
pub struct SourceProvider {
    kind: SourceKind,
    fs: Box<dyn SourceFs>,
    _checkout: Option<Checkout>,
}

impl fmt::Debug for SourceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceProvider")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl SourceProvider {
    /// Open the lab's source, cloning it when it is a repository.
    pub fn open(location: &SourceLocation, cloner: &dyn Cloner) -> Result<Self, SourceError> {
        match location {
            SourceLocation::Local(path) => Self::local(path),
            SourceLocation::Repository { url, branch } => {
                let checkout = cloner.clone_repo(url, branch.as_deref())?;
                Ok(Self::lab_repo(checkout))
            }
        }
    }

    /// Lab directory on disk.
    pub fn local(root: &Path) -> Result<Self, SourceError> {
        if !root.is_dir() {
            return Err(SourceError::MissingDir(root.to_path_buf()));
        }
        Ok(Self::with_fs(SourceKind::Local, DirFs::new(root)))
    }

    /// Cloned lab repository.
    pub fn lab_repo(checkout: Checkout) -> Self {
        Self {
            kind: SourceKind::LabRepo,
            fs: Box::new(DirFs::new(checkout.root())),
            _checkout: Some(checkout),
        }
    }

    /// Cloned device repository.
    pub fn device_repo(checkout: Checkout) -> Self {
        Self {
            kind: SourceKind::DeviceRepo {
                repo_name: checkout.name().to_string(),
            },
            fs: Box::new(DirFs::new(checkout.root())),
            _checkout: Some(checkout),
        }
    }

    /// Provider over an arbitrary filesystem.
    pub fn with_fs(kind: SourceKind, fs: impl SourceFs + 'static) -> Self {
        Self {
            kind,
            fs: Box::new(fs),
            _checkout: None,
        }
    }

    pub fn kind(&self) -> &SourceKind {
        &self.kind
    }

    pub fn fs(&self) -> &dyn SourceFs {
        self.fs.as_ref()
    }

    /// Short label for log lines.
    pub fn label(&self) -> String {
        match &self.kind {
            SourceKind::Local => "lab directory".to_string(),
            SourceKind::LabRepo => "lab repository".to_string(),
            SourceKind::DeviceRepo { repo_name } => format!("device repository {repo_name}"),
        }
    }

    /// Directory the tree walk starts at.
    ///
    /// Device repositories are firmware repositories; only their
    /// `docs/manuals` subtree holds manuals.
    pub fn walk_root(&self) -> PathBuf {
        match self.kind {
            SourceKind::DeviceRepo { .. } => DEVICE_MANUALS_DIR.iter().collect(),
            _ => PathBuf::new(),
        }
    }

    /// Map a source file path to its path in the built site.
    pub fn destination_path(&self, path: &Path) -> Result<PathBuf, MappingError> {
        match &self.kind {
            SourceKind::Local | SourceKind::LabRepo => Ok(path.to_path_buf()),
            SourceKind::DeviceRepo { repo_name } => device_destination(repo_name, path),
        }
    }

    /// Map a source directory path to its path in the built site.
    ///
    /// Directories below a device manual map like files do; the manual
    /// directories themselves have no counterpart.
    pub fn destination_dir_path(&self, path: &Path) -> Result<PathBuf, MappingError> {
        self.destination_path(path)
    }
}

/// `docs/manuals/<type>/<rest..>` → `devices/<repo>/<type>/manufacturer/<rest..>`
///
/// `manufacturer` takes the campaign slot, so device-authored manuals sit
/// next to the lab's campaign manuals for the same device and manual type.
fn device_destination(repo: &str, path: &Path) -> Result<PathBuf, MappingError> {
    let structure = || MappingError::Structure {
        repo: repo.to_string(),
        path: path.to_path_buf(),
    };

    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str().ok_or_else(structure)?),
            Component::CurDir => {}
            _ => return Err(MappingError::Escape(path.to_path_buf())),
        }
    }

    match parts.as_slice() {
        [docs, manuals, manual_type, rest @ ..]
            if [*docs, *manuals] == DEVICE_MANUALS_DIR && !rest.is_empty() =>
        {
            let mut out = PathBuf::from(DEVICES_DIR);
            out.push(repo);
            out.push(manual_type);
            out.push(MANUFACTURER_CAMPAIGN);
            out.extend(rest);
            Ok(out)
        }
        _ => Err(structure()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn device(name: &str) -> SourceProvider {
        SourceProvider::with_fs(
            SourceKind::DeviceRepo {
                repo_name: name.to_string(),
            },
            DirFs::new("/nonexistent"),
        )
    }

    #[test]
    fn test_local_identity() {
        let temp = TempDir::new().unwrap();
        let provider = SourceProvider::local(temp.path()).unwrap();
        let path = Path::new("campaigns/generic/installation/languages/en-US.md");
        assert_eq!(provider.destination_path(path).unwrap(), path);
        assert_eq!(
            provider.destination_dir_path(Path::new("a/b")).unwrap(),
            Path::new("a/b")
        );
        assert_eq!(provider.walk_root(), PathBuf::new());
    }

    #[test]
    fn test_local_missing_dir() {
        let err = SourceProvider::local(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, SourceError::MissingDir(_)));
    }

    #[test]
    fn test_lab_repo_identity() {
        let temp = TempDir::new().unwrap();
        let provider = SourceProvider::lab_repo(Checkout::new(temp.path(), "lab"));
        assert_eq!(provider.kind(), &SourceKind::LabRepo);
        let path = Path::new("devices/SensorX/display_names.json");
        assert_eq!(provider.destination_path(path).unwrap(), path);
    }

    #[test]
    fn test_device_mapping() {
        let provider = device("SensorX");
        assert_eq!(
            provider
                .destination_path(Path::new("docs/manuals/installation/languages/en-US.md"))
                .unwrap(),
            Path::new("devices/SensorX/installation/manufacturer/languages/en-US.md")
        );
        assert_eq!(
            provider
                .destination_path(Path::new("docs/manuals/installation/assets/img/a.png"))
                .unwrap(),
            Path::new("devices/SensorX/installation/manufacturer/assets/img/a.png")
        );
        assert_eq!(
            provider
                .destination_dir_path(Path::new("docs/manuals/installation/assets/empty"))
                .unwrap(),
            Path::new("devices/SensorX/installation/manufacturer/assets/empty")
        );
        assert!(provider
            .destination_dir_path(Path::new("docs/manuals/installation"))
            .is_err());
        assert_eq!(provider.walk_root(), Path::new("docs/manuals"));
    }

    #[test]
    fn test_device_mapping_structure_errors() {
        let provider = device("SensorX");
        for bad in [
            "docs/manuals/en-US.md",
            "docs/en-US.md",
            "README.md",
            "other/manuals/installation/languages/en-US.md",
        ] {
            assert!(
                matches!(
                    provider.destination_path(Path::new(bad)),
                    Err(MappingError::Structure { .. })
                ),
                "{bad} should not map"
            );
        }
    }

    #[test]
    fn test_device_mapping_is_injective() {
        let provider = device("SensorX");
        let sources = [
            "docs/manuals/installation/languages/en-US.md",
            "docs/manuals/installation/languages/nl-NL.md",
            "docs/manuals/faq/languages/en-US.md",
            "docs/manuals/installation/assets/a.png",
        ];
        let mut seen = std::collections::HashSet::new();
        for source in sources {
            assert!(seen.insert(provider.destination_path(Path::new(source)).unwrap()));
        }
    }

    #[test]
    fn test_source_location_parse() {
        assert_eq!(
            SourceLocation::parse("https://github.com/lab/manuals.git", Some("dev")),
            SourceLocation::Repository {
                url: "https://github.com/lab/manuals.git".to_string(),
                branch: Some("dev".to_string()),
            }
        );
        assert_eq!(
            SourceLocation::parse("https://github.com/lab/manuals.git", Some("")),
            SourceLocation::Repository {
                url: "https://github.com/lab/manuals.git".to_string(),
                branch: None,
            }
        );
        assert_eq!(
            SourceLocation::parse("./source", None),
            SourceLocation::Local(PathBuf::from("./source"))
        );
    }
}
