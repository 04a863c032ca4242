//! `build` command: transform the manual source into the output directory.
//!
//! The source is opened (cloned when it is a repository), walked into a
//! staging directory next to the output, and swapped in only when every
//! page rendered. A failed build leaves the previously published site
//! untouched.

use crate::{
    compiler::{BuildStats, Transformer},
    config::ManualConfig,
    log,
    output::BuildSession,
    source::{SourceProvider, git::GitCloner},
};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Instant;

/// Build the manuals configured in `config`.
///
/// Returns the path of the published output directory.
pub fn build_manuals(config: &ManualConfig) -> Result<PathBuf> {
    let started = Instant::now();
    let location = config.source_location();
    let options = config.build.options();
    let output = &config.build.output;

    log!("build"; "building {} into {}", location, output.display());

    let mut session = BuildSession::open(output)
        .with_context(|| format!("Failed to prepare staging for {}", output.display()))?;

    let cloner = GitCloner;
    let provider = SourceProvider::open(&location, &cloner)
        .with_context(|| format!("Failed to open {location}"))?;

    let stats = Transformer::new(&cloner, &options)
        .run(provider, &mut session)
        .context("Build failed, published site left unchanged")?;

    let published = session
        .commit()
        .with_context(|| format!("Failed to publish {}", output.display()))?;

    log_stats(&stats, started);
    Ok(published)
}

fn log_stats(stats: &BuildStats, started: Instant) {
    log!(
        "build";
        "{} pages, {} files copied, {} repositories ({} skipped) in {:.1}s",
        stats.pages,
        stats.copied,
        stats.repositories,
        stats.skipped_repositories,
        started.elapsed().as_secs_f64()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &std::path::Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_build_local_source() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        write(
            &source,
            "template.html",
            "<html lang=\"{{ .Language }}\"><title>{{ .Title }}</title>{{ .Body }}</html>",
        );
        write(
            &source,
            "campaigns/generic/installation/languages/en-US.md",
            "# Install\n\nText",
        );
        write(&source, "campaigns/generic/installation/assets/a.txt", "asset");

        let mut config = ManualConfig::default();
        config.source.location = source.to_string_lossy().into_owned();
        config.build.output = temp.path().join("parsed");

        let published = build_manuals(&config).unwrap();
        assert_eq!(published, temp.path().join("parsed"));

        let page = fs::read_to_string(
            published.join("campaigns/generic/installation/en-US/index.html"),
        )
        .unwrap();
        assert!(page.starts_with("<html lang=\"en-US\"><title>Install</title>"));
        assert_eq!(
            fs::read_to_string(published.join("campaigns/generic/installation/assets/a.txt"))
                .unwrap(),
            "asset"
        );
    }

    #[test]
    fn test_failed_build_keeps_published_site() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        // No template anywhere.
        write(&source, "campaigns/generic/x/languages/en-US.md", "# X");
        let output = temp.path().join("parsed");
        write(&output, "index.html", "old");

        let mut config = ManualConfig::default();
        config.source.location = source.to_string_lossy().into_owned();
        config.build.output = output.clone();

        assert!(build_manuals(&config).is_err());
        assert_eq!(fs::read_to_string(output.join("index.html")).unwrap(), "old");
    }
}
