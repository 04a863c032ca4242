//! Image inlining.
//!
//! Every image a manual references becomes a `data:` URI so a rendered page
//! is a single self-contained file.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine;
use percent_encoding::percent_decode_str;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use crate::debug;
use crate::source::fs::SourceFs;
use crate::utils::mime;
use crate::utils::path::clean_relative;

/// Upper bound on a fetched image, guards against unbounded bodies.
const MAX_REMOTE_BYTES: u64 = 32 * 1024 * 1024;

/// Errors raised while loading an image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("request failed")]
    Fetch(#[source] Box<ureq::Error>),

    #[error("failed to read image data")]
    Io(#[from] io::Error),

    #[error("`{}` escapes the source root", .0.display())]
    Escape(PathBuf),

    #[error("`{url}` is larger than {limit} bytes")]
    TooLarge { url: String, limit: u64 },
}

/// Turns image references into `data:` URIs.
pub struct ImageInliner {
    agent: ureq::Agent,
    max_bytes: u64,
}

impl ImageInliner {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            max_bytes: MAX_REMOTE_BYTES,
        }
    }

    #[cfg(test)]
    fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Inline one reference made from the manual in `page_dir`.
    ///
    /// `data:` URIs are returned unchanged.
    pub fn inline(
        &self,
        fs: &dyn SourceFs,
        page_dir: &Path,
        reference: &str,
    ) -> Result<String, ImageError> {
        if reference.starts_with("data:") {
            return Ok(reference.to_string());
        }

        let (bytes, ext) = if is_remote(reference) {
            (self.fetch(reference)?, remote_extension(reference))
        } else {
            let path = resolve_local(page_dir, reference)?;
            let ext = extension(&path);
            (fs.read(&path)?, ext)
        };

        Ok(data_uri(&ext, &bytes))
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        debug!("build"; "fetching image {}", url);
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| ImageError::Fetch(Box::new(e)))?;

        // One byte past the limit tells a full body from a cut one.
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(self.max_bytes + 1)
            .read_to_end(&mut bytes)?;
        if bytes.len() as u64 > self.max_bytes {
            return Err(ImageError::TooLarge {
                url: url.to_string(),
                limit: self.max_bytes,
            });
        }
        Ok(bytes)
    }
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Resolve a relative reference against the manual's directory.
fn resolve_local(page_dir: &Path, reference: &str) -> Result<PathBuf, ImageError> {
    let decoded = percent_decode_str(reference).decode_utf8_lossy();
    let joined = page_dir.join(decoded.as_ref());
    clean_relative(&joined).ok_or(ImageError::Escape(joined))
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Extension of the URL path, ignoring query and fragment.
fn remote_extension(url: &str) -> String {
    url::Url::parse(url)
        .map(|parsed| extension(Path::new(parsed.path())))
        .unwrap_or_default()
}

/// `data:image/<subtype>;base64,<payload>`
pub fn data_uri(ext: &str, bytes: &[u8]) -> String {
    format!(
        "data:image/{};base64,{}",
        mime::image_subtype(ext),
        STANDARD.encode(bytes)
    )
}
