//! Source entry classification.

use super::{ASSETS_DIR, DISPLAY_NAMES_FILE, MANIFEST_FILE, TEMPLATE_FILE};

/// What the tree walk does with an entry, derived from its name and
/// directory-ness only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Ignore-listed file (README, LICENSE) - skipped
    Ignored,
    /// Manual page (`<lang>.md`) - rendered to HTML
    Markdown,
    /// `details.json` - expands the device's own repository
    Manifest,
    /// `display_names.json` - copied verbatim
    DisplayNames,
    /// `template.html` - read by the renderer, not emitted
    Template,
    /// `assets/` directory - copied recursively
    AssetDir,
    /// Any other directory - walked
    PlainDir,
    /// Everything else - not emitted
    Other,
}

impl EntryKind {
    /// Classify an entry. Checks run in priority order.
    pub fn classify<S: AsRef<str>>(name: &str, is_dir: bool, ignore: &[S]) -> Self {
        if is_dir {
            return if name == ASSETS_DIR {
                Self::AssetDir
            } else {
                Self::PlainDir
            };
        }

        if ignore.iter().any(|ignored| ignored.as_ref() == name) {
            Self::Ignored
        } else if name.ends_with(".md") {
            Self::Markdown
        } else if name == MANIFEST_FILE {
            Self::Manifest
        } else if name == DISPLAY_NAMES_FILE {
            Self::DisplayNames
        } else if name == TEMPLATE_FILE {
            Self::Template
        } else {
            Self::Other
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ignored => "ignored",
            Self::Markdown => "markdown",
            Self::Manifest => "manifest",
            Self::DisplayNames => "display-names",
            Self::Template => "template",
            Self::AssetDir => "asset-dir",
            Self::PlainDir => "plain-dir",
            Self::Other => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IGNORE: [&str; 4] = ["README.md", "readme.md", "LICENSE.md", "license.md"];

    #[test]
    fn test_classify_files() {
        assert_eq!(EntryKind::classify("en-US.md", false, &IGNORE), EntryKind::Markdown);
        assert_eq!(EntryKind::classify("details.json", false, &IGNORE), EntryKind::Manifest);
        assert_eq!(
            EntryKind::classify("display_names.json", false, &IGNORE),
            EntryKind::DisplayNames
        );
        assert_eq!(EntryKind::classify("template.html", false, &IGNORE), EntryKind::Template);
        assert_eq!(EntryKind::classify("notes.txt", false, &IGNORE), EntryKind::Other);
    }

    #[test]
    fn test_ignore_beats_markdown() {
        assert_eq!(EntryKind::classify("README.md", false, &IGNORE), EntryKind::Ignored);
        assert_eq!(EntryKind::classify("license.md", false, &IGNORE), EntryKind::Ignored);
        // Case variants not in the list are plain markdown.
        assert_eq!(EntryKind::classify("Readme.md", false, &IGNORE), EntryKind::Markdown);
    }

    #[test]
    fn test_classify_dirs() {
        assert_eq!(EntryKind::classify("assets", true, &IGNORE), EntryKind::AssetDir);
        assert_eq!(EntryKind::classify("languages", true, &IGNORE), EntryKind::PlainDir);
        // Directories are never ignore-listed or treated as files.
        assert_eq!(EntryKind::classify("README.md", true, &IGNORE), EntryKind::PlainDir);
        assert_eq!(EntryKind::classify("details.json", true, &IGNORE), EntryKind::PlainDir);
        assert_eq!(EntryKind::classify("template.html", true, &IGNORE), EntryKind::PlainDir);
    }

    #[test]
    fn test_names() {
        assert_eq!(EntryKind::Template.name(), "template");
        assert_eq!(EntryKind::DisplayNames.name(), "display-names");
    }
}
