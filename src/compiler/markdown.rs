//! Markdown manuals to HTML pages.

use std::path::{Path, PathBuf};

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

use super::BuildError;
use super::image::ImageInliner;
use crate::core::{FALLBACK_TITLE, LANGUAGES_DIR};
use crate::source::fs::SourceFs;

/// Options for markdown conversion
#[derive(Debug, Clone, Default)]
pub struct MarkdownOptions {
    /// Enable tables extension
    pub tables: bool,
    /// Enable footnotes extension
    pub footnotes: bool,
    /// Enable strikethrough extension
    pub strikethrough: bool,
    /// Enable task lists extension
    pub task_lists: bool,
    /// Enable heading attributes extension (e.g., `# Heading {#custom-id}`)
    pub heading_attributes: bool,
    /// Enable definition lists
    pub definition_lists: bool,
    /// Curly quotes, dashes and ellipses
    pub smart_punctuation: bool,
}

impl MarkdownOptions {
    /// Create options with all extensions enabled
    pub fn all() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            heading_attributes: true,
            definition_lists: true,
            smart_punctuation: true,
        }
    }

    /// Convert to pulldown-cmark Options
    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        if self.heading_attributes {
            opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        if self.definition_lists {
            opts.insert(Options::ENABLE_DEFINITION_LIST);
        }
        if self.smart_punctuation {
            opts.insert(Options::ENABLE_SMART_PUNCTUATION);
        }
        opts
    }
}

/// One rendered manual, ready for its template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualPage {
    /// Language tag, the markdown file stem
    pub language: String,
    pub title: String,
    /// Rendered HTML fragment, trusted
    pub body: String,
}

/// Render the markdown file at `path` (relative to the source root).
///
/// Images are inlined through `images`; the first failing image aborts the
/// page.
pub fn render(
    fs: &dyn SourceFs,
    path: &Path,
    images: &ImageInliner,
    options: &MarkdownOptions,
) -> Result<ManualPage, BuildError> {
    let bytes = fs.read(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let markdown = String::from_utf8_lossy(&bytes);
    let page_dir = path.parent().unwrap_or(Path::new(""));

    let mut failure = None;
    let parser = Parser::new_ext(&markdown, options.to_pulldown_options()).map(|event| {
        let Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) = event
        else {
            return event;
        };

        let dest_url = if failure.is_some() {
            dest_url
        } else {
            match images.inline(fs, page_dir, &dest_url) {
                Ok(uri) => CowStr::from(uri),
                Err(source) => {
                    failure = Some(BuildError::Image {
                        page: path.to_path_buf(),
                        reference: dest_url.to_string(),
                        source,
                    });
                    dest_url
                }
            }
        };
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        })
    });

    let mut body = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut body, parser);
    if let Some(err) = failure {
        return Err(err);
    }

    Ok(ManualPage {
        language: language_of(path),
        title: find_title(&markdown),
        body,
    })
}

/// Language tag of a manual: its file stem.
pub fn language_of(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Title from a leading `# ` line, or the fallback title.
///
/// Only the first `\r\n` is normalized, which is all the first line needs.
///
/// # Examples
/// ```ignore
/// assert_eq!(find_title("# My Title\nBody"), "My Title");
/// assert_eq!(find_title("Body"), "Twomes manual");
/// ```
pub fn find_title(markdown: &str) -> String {
    let normalized = markdown.replacen("\r\n", "\n", 1);
    let first_line = normalized.split('\n').next().unwrap_or_default();
    match first_line.strip_prefix("# ") {
        Some(title) => title.trim().to_string(),
        None => FALLBACK_TITLE.to_string(),
    }
}

/// Output path of a rendered manual.
///
/// `.../languages/en-US.md` becomes `.../en-US/index.html`; a parent not
/// named `languages` is kept.
pub fn html_output_path(destination: &Path) -> PathBuf {
    let language = language_of(destination);
    let mut dir = destination.parent().unwrap_or(Path::new("")).to_path_buf();
    if dir.file_name().is_some_and(|name| name == LANGUAGES_DIR) {
        dir.pop();
    }
    dir.join(language).join("index.html")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fs::DirFs;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn images() -> ImageInliner {
        ImageInliner::new(Duration::from_secs(1))
    }

    #[test]
    fn test_find_title() {
        assert_eq!(find_title("# My Title\nBody"), "My Title");
        assert_eq!(find_title("#   Padded  \r\nBody"), "Padded");
        assert_eq!(find_title("Body\n# Later"), FALLBACK_TITLE);
        assert_eq!(find_title("## Sub\nBody"), FALLBACK_TITLE);
        assert_eq!(find_title(""), FALLBACK_TITLE);
    }

    #[test]
    fn test_html_output_path() {
        assert_eq!(
            html_output_path(Path::new("campaigns/generic/installation/languages/en-US.md")),
            Path::new("campaigns/generic/installation/en-US/index.html")
        );
        assert_eq!(
            html_output_path(Path::new("x/nl-NL.md")),
            Path::new("x/nl-NL/index.html")
        );
        assert_eq!(html_output_path(Path::new("en.md")), Path::new("en/index.html"));
    }

    #[test]
    fn test_render_with_inlined_image() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("m/languages")).unwrap();
        fs::create_dir_all(root.join("m/assets")).unwrap();
        fs::write(root.join("m/assets/a.png"), b"abc").unwrap();
        fs::write(
            root.join("m/languages/en-US.md"),
            "# Install\n\nSome *text*.\n\n![pic](../assets/a.png)\n",
        )
        .unwrap();

        let page = render(
            &DirFs::new(root),
            Path::new("m/languages/en-US.md"),
            &images(),
            &MarkdownOptions::all(),
        )
        .unwrap();

        assert_eq!(page.language, "en-US");
        assert_eq!(page.title, "Install");
        assert!(page.body.contains("<h1>Install</h1>"));
        assert!(page.body.contains("<em>text</em>"));
        assert!(page.body.contains(r#"src="data:image/png;base64,YWJj""#));
        assert!(!page.body.contains("../assets"));
    }

    #[test]
    fn test_render_missing_image_fails() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("en-US.md"), "![x](nope.png)").unwrap();

        let err = render(
            &DirFs::new(temp.path()),
            Path::new("en-US.md"),
            &images(),
            &MarkdownOptions::all(),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::Image { reference, .. } if reference == "nope.png"));
    }

    #[test]
    fn test_render_tables() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("nl-NL.md"), "| a | b |\n|---|---|\n| 1 | 2 |\n").unwrap();

        let page = render(
            &DirFs::new(temp.path()),
            Path::new("nl-NL.md"),
            &images(),
            &MarkdownOptions::all(),
        )
        .unwrap();
        assert!(page.body.contains("<table>"));
        assert_eq!(page.title, FALLBACK_TITLE);
    }
}
