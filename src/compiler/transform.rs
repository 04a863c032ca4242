//! Worklist walk over source providers.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use super::BuildError;
use super::image::ImageInliner;
use super::manifest::Details;
use super::markdown::{self, MarkdownOptions};
use super::template;
use crate::core::EntryKind;
use crate::language::LanguageTag;
use crate::output::BuildSession;
use crate::source::SourceProvider;
use crate::source::git::Cloner;
use crate::{debug, log};

/// Directories never walked (VCS metadata of cloned sources).
const SKIPPED_DIRS: &[&str] = &[".git"];

/// Knobs of one build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// File names skipped everywhere in the tree
    pub ignore: Vec<String>,
    /// Timeout for each remote image fetch
    pub image_timeout: Duration,
}

/// What a build produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    pub pages: usize,
    pub copied: usize,
    pub repositories: usize,
    pub skipped_repositories: usize,
}

/// One pending unit of work, paths relative to its provider's root.
#[derive(Debug)]
enum Task {
    /// Classify and dispatch every entry of a directory
    Walk(PathBuf),
    /// Render a markdown manual
    Render(PathBuf),
    /// Byte-copy one file
    Copy(PathBuf),
    /// Byte-copy a directory tree
    CopyDir(PathBuf),
    /// Expand the repository named by a manifest
    Expand(PathBuf),
}

pub struct Transformer<'a> {
    cloner: &'a dyn Cloner,
    ignore: &'a [String],
    images: ImageInliner,
    markdown: MarkdownOptions,
    expanded: HashSet<String>,
    stack: Vec<(Rc<SourceProvider>, Task)>,
    stats: BuildStats,
}

impl<'a> Transformer<'a> {
    pub fn new(cloner: &'a dyn Cloner, options: &'a BuildOptions) -> Self {
        Self {
            cloner,
            ignore: &options.ignore,
            images: ImageInliner::new(options.image_timeout),
            markdown: MarkdownOptions::all(),
            expanded: HashSet::new(),
            stack: Vec::new(),
            stats: BuildStats::default(),
        }
    }

    /// Transform `provider` and every repository it references into
    /// `session`. Stops at the first error.
    pub fn run(
        mut self,
        provider: SourceProvider,
        session: &mut BuildSession,
    ) -> Result<BuildStats, BuildError> {
        let root = provider.walk_root();
        self.stack.push((Rc::new(provider), Task::Walk(root)));

        while let Some((provider, task)) = self.stack.pop() {
            match task {
                Task::Walk(dir) => self.walk(&provider, &dir)?,
                Task::Render(path) => self.render(&provider, &path, session)?,
                Task::Copy(path) => self.copy(&provider, &path, session)?,
                Task::CopyDir(dir) => self.copy_dir(&provider, &dir, session)?,
                Task::Expand(path) => self.expand(&provider, &path)?,
            }
        }
        Ok(self.stats)
    }

    fn walk(&mut self, provider: &Rc<SourceProvider>, dir: &Path) -> Result<(), BuildError> {
        let entries = list(provider, dir)?;

        // Reverse so the stack pops entries in name order.
        for entry in entries.into_iter().rev() {
            let path = dir.join(&entry.name);
            let task = match EntryKind::classify(&entry.name, entry.is_dir, self.ignore) {
                EntryKind::Markdown => Task::Render(path),
                EntryKind::Manifest => Task::Expand(path),
                EntryKind::DisplayNames => Task::Copy(path),
                EntryKind::AssetDir => Task::CopyDir(path),
                EntryKind::PlainDir if SKIPPED_DIRS.contains(&entry.name.as_str()) => continue,
                EntryKind::PlainDir => Task::Walk(path),
                kind @ (EntryKind::Ignored | EntryKind::Template | EntryKind::Other) => {
                    debug!("build"; "skip {} ({})", path.display(), kind.name());
                    continue;
                }
            };
            self.stack.push((Rc::clone(provider), task));
        }
        Ok(())
    }

    fn render(
        &mut self,
        provider: &SourceProvider,
        path: &Path,
        session: &mut BuildSession,
    ) -> Result<(), BuildError> {
        let fs = provider.fs();
        let page = markdown::render(fs, path, &self.images, &self.markdown)?;
        if LanguageTag::parse(&page.language).is_err() {
            log!("warning"; "`{}` is not named after a language tag; it will not be negotiated", path.display());
        }

        let template = template::load_for(fs, path)?;
        let output = markdown::html_output_path(&provider.destination_path(path)?);
        debug!("build"; "{} -> {} (template {})", path.display(), output.display(), template.path().display());

        session.write(&output, template.render(&page).as_bytes())?;
        self.stats.pages += 1;
        Ok(())
    }

    fn copy(
        &mut self,
        provider: &SourceProvider,
        path: &Path,
        session: &mut BuildSession,
    ) -> Result<(), BuildError> {
        let bytes = provider.fs().read(path).map_err(|source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        session.write(&provider.destination_path(path)?, &bytes)?;
        self.stats.copied += 1;
        Ok(())
    }

    fn copy_dir(
        &mut self,
        provider: &Rc<SourceProvider>,
        dir: &Path,
        session: &mut BuildSession,
    ) -> Result<(), BuildError> {
        let entries = list(provider, dir)?;
        if entries.is_empty() {
            return session.create_dir(&provider.destination_dir_path(dir)?);
        }

        for entry in entries.into_iter().rev() {
            let path = dir.join(&entry.name);
            let task = if entry.is_dir {
                Task::CopyDir(path)
            } else {
                Task::Copy(path)
            };
            self.stack.push((Rc::clone(provider), task));
        }
        Ok(())
    }

    fn expand(&mut self, provider: &SourceProvider, path: &Path) -> Result<(), BuildError> {
        let bytes = provider.fs().read(path).map_err(|source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let url = Details::parse(path, &bytes)?.firmware_repository;

        if !self.expanded.insert(url.clone()) {
            debug!("git"; "{} already expanded, skipping reference in {}", url, path.display());
            return Ok(());
        }

        let checkout = match self.cloner.clone_repo(&url, None) {
            Ok(checkout) => checkout,
            Err(e) if e.is_auth() => {
                log!("git"; "device repository {} needs authentication, skipping", url);
                self.stats.skipped_repositories += 1;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let device = SourceProvider::device_repo(checkout);
        let root = device.walk_root();
        if !device.fs().is_dir(&root) {
            log!("git"; "{} has no {} directory, skipping", device.label(), root.display());
            self.stats.skipped_repositories += 1;
            return Ok(());
        }

        log!("git"; "expanding {}", device.label());
        self.stats.repositories += 1;
        self.stack.push((Rc::new(device), Task::Walk(root)));
        Ok(())
    }
}

fn list(provider: &SourceProvider, dir: &Path) -> Result<Vec<crate::source::fs::FsEntry>, BuildError> {
    provider.fs().read_dir(dir).map_err(|source| BuildError::Io {
        path: dir.to_path_buf(),
        source,
    })
}
