//! Page templates.
//!
//! A `template.html` governs every manual below its directory until a closer
//! one is found. Templates use Go-style actions with three fields:
//!
//! ```text
//! <html lang="{{.Language}}"><title>{{ .Title }}</title>{{- .Body -}}</html>
//! ```
//!
//! `-` trims whitespace on that side of the action. `Language` and `Title`
//! are HTML-escaped; `Body` is inserted as is.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::BuildError;
use super::markdown::ManualPage;
use crate::core::TEMPLATE_FILE;
use crate::source::fs::SourceFs;
use crate::utils::html::escape;

static ACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(-)?[ \t\r\n]*(.*?)[ \t\r\n]*(-)?\}\}").expect("action pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Language,
    Title,
    Body,
}

impl Field {
    fn parse(action: &str) -> Option<Self> {
        match action {
            ".Language" => Some(Self::Language),
            ".Title" => Some(Self::Title),
            ".Body" => Some(Self::Body),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Field(Field),
}

/// A parsed `template.html`.
#[derive(Debug, Clone)]
pub struct PageTemplate {
    path: PathBuf,
    parts: Vec<Part>,
}

impl PageTemplate {
    /// Parse template source read from `path`.
    pub fn parse(path: &Path, source: &str) -> Result<Self, BuildError> {
        let mut parts = Vec::new();
        let mut last = 0;
        let mut trim_next = false;

        for caps in ACTION.captures_iter(source) {
            let Some(whole) = caps.get(0) else { continue };
            let mut text = &source[last..whole.start()];
            if trim_next {
                text = text.trim_start();
            }
            if caps.get(1).is_some() {
                text = text.trim_end();
            }
            if !text.is_empty() {
                parts.push(Part::Text(text.to_string()));
            }

            let action = caps.get(2).map_or("", |m| m.as_str());
            let field = Field::parse(action).ok_or_else(|| BuildError::Template {
                path: path.to_path_buf(),
                message: format!("unsupported action `{{{{{action}}}}}`"),
            })?;
            parts.push(Part::Field(field));

            trim_next = caps.get(3).is_some();
            last = whole.end();
        }

        let mut tail = &source[last..];
        if trim_next {
            tail = tail.trim_start();
        }
        if tail.contains("{{") {
            return Err(BuildError::Template {
                path: path.to_path_buf(),
                message: "unclosed action".to_string(),
            });
        }
        if !tail.is_empty() {
            parts.push(Part::Text(tail.to_string()));
        }

        Ok(Self {
            path: path.to_path_buf(),
            parts,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn render(&self, page: &ManualPage) -> String {
        let mut out = String::with_capacity(page.body.len() + 1024);
        for part in &self.parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Field(Field::Language) => out.push_str(&escape(&page.language)),
                Part::Field(Field::Title) => out.push_str(&escape(&page.title)),
                Part::Field(Field::Body) => out.push_str(&page.body),
            }
        }
        out
    }
}

/// Find the `template.html` closest to `page_dir`.
///
/// Checks `page_dir` itself, then each ancestor up to and including the
/// source root (the empty path).
pub fn find_template(fs: &dyn SourceFs, page_dir: &Path) -> Option<PathBuf> {
    page_dir
        .ancestors()
        .map(|dir| dir.join(TEMPLATE_FILE))
        .find(|candidate| fs.is_file(candidate))
}

/// Find, read and parse the template governing the manual at `page`.
pub fn load_for(fs: &dyn SourceFs, page: &Path) -> Result<PageTemplate, BuildError> {
    let page_dir = page.parent().unwrap_or(Path::new(""));
    let path =
        find_template(fs, page_dir).ok_or_else(|| BuildError::TemplateNotFound(page.to_path_buf()))?;
    let bytes = fs.read(&path).map_err(|source| BuildError::Io {
        path: path.clone(),
        source,
    })?;
    PageTemplate::parse(&path, &String::from_utf8_lossy(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fs::DirFs;
    use std::fs;
    use tempfile::TempDir;

    fn page() -> ManualPage {
        ManualPage {
            language: "en-US".to_string(),
            title: "Fish & Chips".to_string(),
            body: "<p>hi</p>".to_string(),
        }
    }

    #[test]
    fn test_render_fields() {
        let template = PageTemplate::parse(
            Path::new("template.html"),
            r#"<html lang="{{.Language}}"><title>{{ .Title }}</title><main>{{.Body}}</main></html>"#,
        )
        .unwrap();

        assert_eq!(
            template.render(&page()),
            r#"<html lang="en-US"><title>Fish &amp; Chips</title><main><p>hi</p></main></html>"#
        );
    }

    #[test]
    fn test_trim_markers() {
        let template =
            PageTemplate::parse(Path::new("t"), "<main>\n  {{- .Body -}}\n</main>").unwrap();
        assert_eq!(template.render(&page()), "<main><p>hi</p></main>");
    }

    #[test]
    fn test_unknown_action_rejected() {
        let err = PageTemplate::parse(Path::new("t"), "{{ .Author }}").unwrap_err();
        assert!(matches!(err, BuildError::Template { .. }));

        let err = PageTemplate::parse(Path::new("t"), "<p>{{ .Title </p>").unwrap_err();
        assert!(matches!(err, BuildError::Template { .. }));
    }

    #[test]
    fn test_closest_template_wins() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("campaigns/generic/installation/languages")).unwrap();
        fs::write(root.join("template.html"), "root").unwrap();
        fs::write(root.join("campaigns/template.html"), "campaigns").unwrap();
        let source = DirFs::new(root);

        let page_dir = Path::new("campaigns/generic/installation/languages");
        assert_eq!(
            find_template(&source, page_dir).unwrap(),
            Path::new("campaigns/template.html")
        );

        fs::write(
            root.join("campaigns/generic/installation/template.html"),
            "installation",
        )
        .unwrap();
        assert_eq!(
            find_template(&source, page_dir).unwrap(),
            Path::new("campaigns/generic/installation/template.html")
        );
    }

    #[test]
    fn test_root_template_and_missing() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();
        let source = DirFs::new(temp.path());

        let err = load_for(&source, Path::new("a/b/en-US.md")).unwrap_err();
        assert!(matches!(err, BuildError::TemplateNotFound(_)));

        fs::write(temp.path().join("template.html"), "{{.Title}}").unwrap();
        let template = load_for(&source, Path::new("a/b/en-US.md")).unwrap();
        assert_eq!(template.path(), Path::new("template.html"));
    }
}
