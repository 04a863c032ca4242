//! Lexical cleaning of paths relative to a tree root.

use std::path::{Component, Path, PathBuf};

/// Lexically clean a path that is relative to some tree root.
///
/// Removes `.` components and resolves `..` against the preceding component.
/// Returns `None` when the path is absolute or climbs above the root.
///
/// # Example
/// ```ignore
/// clean_relative(Path::new("a/languages/../assets/x.png")) == Some("a/assets/x.png")
/// clean_relative(Path::new("../secret")) == None
/// ```
pub fn clean_relative(path: &Path) -> Option<PathBuf> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(part) => parts.push(part),
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(parts.iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_relative() {
        assert_eq!(
            clean_relative(Path::new("a/./b/../c.png")),
            Some(PathBuf::from("a/c.png"))
        );
        assert_eq!(
            clean_relative(Path::new("campaigns/generic/languages/../assets/x.png")),
            Some(PathBuf::from("campaigns/generic/assets/x.png"))
        );
        assert_eq!(clean_relative(Path::new("")), Some(PathBuf::new()));
    }

    #[test]
    fn test_clean_relative_rejects_escape() {
        assert_eq!(clean_relative(Path::new("../x")), None);
        assert_eq!(clean_relative(Path::new("a/../../x")), None);
        assert_eq!(clean_relative(Path::new("/etc/passwd")), None);
    }
}
