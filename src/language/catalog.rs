//! Languages a built manual is available in.

use std::fs;
use std::io;
use std::path::Path;

use super::LanguageTag;

/// List the language subdirectories of a manual directory.
///
/// Names that are not language tags (`assets`, ...) are skipped. The result
/// is sorted by directory name. A missing directory is
/// [`io::ErrorKind::NotFound`].
pub fn available_languages(dir: &Path) -> io::Result<Vec<LanguageTag>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    names.sort();

    Ok(names
        .iter()
        .filter_map(|name| LanguageTag::parse(name).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_available_languages() {
        let temp = TempDir::new().unwrap();
        for dir in ["nl-NL", "assets", "en-US", "de"] {
            fs::create_dir(temp.path().join(dir)).unwrap();
        }
        fs::write(temp.path().join("fr.txt"), "not a dir").unwrap();

        let tags: Vec<_> = available_languages(temp.path())
            .unwrap()
            .into_iter()
            .map(|t| t.to_string())
            .collect();
        assert_eq!(tags, vec!["de", "en-US", "nl-NL"]);
    }

    #[test]
    fn test_missing_dir_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = available_languages(&temp.path().join("nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
