//! Route handlers over a built site directory.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use super::Route;
use crate::core::{DISPLAY_NAMES_FILE, GENERIC_CAMPAIGN, MANUFACTURER_CAMPAIGN};
use crate::language::{LanguageTag, available_languages, negotiate};
use crate::utils::mime;
use crate::utils::path::route::{segments, to_dir_url};

/// What to send back for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// 302 to a site path
    Redirect(String),
    /// A file of the built site
    File(PathBuf),
    /// Bytes read by the handler
    Bytes {
        body: Vec<u8>,
        content_type: &'static str,
    },
}

/// A failed request: the status to answer with and, for the log, why.
#[derive(Debug)]
pub struct HandlerError {
    pub status: u16,
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, status_text(self.status))
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn Error + 'static))
    }
}

impl HandlerError {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            source: None,
        }
    }

    pub fn with_source(
        status: u16,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self {
            status,
            source: Some(source.into()),
        }
    }

    pub fn not_found() -> Self {
        Self::new(404)
    }
}

/// Reason phrase of a status code, sent as the body of error responses.
pub fn status_text(status: u16) -> String {
    tiny_http::StatusCode(status)
        .default_reason_phrase()
        .to_string()
}

/// Routes requests against the built site at `root`.
#[derive(Debug, Clone)]
pub struct Router {
    root: PathBuf,
    fallback: LanguageTag,
}

impl Router {
    pub fn new(root: impl Into<PathBuf>, fallback: LanguageTag) -> Self {
        Self {
            root: root.into(),
            fallback,
        }
    }

    /// Handle a cleaned request path with the client's `Accept-Language`.
    pub fn handle(&self, path: &str, accept: &str) -> Result<Reply, HandlerError> {
        let parts = segments(path);
        match Route::classify(&parts, path.ends_with('/')) {
            Route::CampaignGeneric => {
                let mut target: Vec<&str> = parts.clone();
                target.insert(1, GENERIC_CAMPAIGN);
                Ok(Reply::Redirect(to_dir_url(&target)))
            }
            Route::Language => self.language_redirect(&parts, accept),
            Route::DisplayNames => self.display_names(&parts),
            Route::EntityGeneric => {
                let mut target: Vec<&str> = parts.clone();
                target.push(GENERIC_CAMPAIGN);
                Ok(Reply::Redirect(to_dir_url(&target)))
            }
            Route::EntityLanguage => self.entity_language_redirect(&parts, accept),
            Route::Static => self.static_file(&parts),
            Route::NotFound => Err(HandlerError::not_found()),
        }
    }

    /// Negotiate a language and retry once with the manufacturer manual
    /// when the campaign has none.
    fn entity_language_redirect(
        &self,
        parts: &[&str],
        accept: &str,
    ) -> Result<Reply, HandlerError> {
        match self.language_redirect(parts, accept) {
            Err(e) if e.status == 404 => {
                let Some((campaign, rest)) = parts.split_last() else {
                    return Err(e);
                };
                if *campaign == MANUFACTURER_CAMPAIGN {
                    return Err(e);
                }
                let mut target: Vec<&str> = rest.to_vec();
                target.push(MANUFACTURER_CAMPAIGN);
                Ok(Reply::Redirect(to_dir_url(&target)))
            }
            other => other,
        }
    }

    fn language_redirect(&self, parts: &[&str], accept: &str) -> Result<Reply, HandlerError> {
        let dir = self.site_path(parts);
        let options = available_languages(&dir).map_err(|e| {
            let status = if e.kind() == io::ErrorKind::NotFound {
                404
            } else {
                500
            };
            HandlerError::with_source(status, e)
        })?;

        let tag = negotiate(&options, &self.fallback, accept).ok_or_else(|| {
            HandlerError::with_source(
                404,
                format!("no language directories in {}", dir.display()),
            )
        })?;

        let mut target: Vec<&str> = parts.to_vec();
        target.push(tag.as_str());
        Ok(Reply::Redirect(to_dir_url(&target)))
    }

    fn display_names(&self, parts: &[&str]) -> Result<Reply, HandlerError> {
        let path = self.site_path(parts).join(DISPLAY_NAMES_FILE);
        let body = fs::read(&path).map_err(|e| HandlerError::with_source(404, e))?;
        Ok(Reply::Bytes {
            body,
            content_type: mime::types::JSON,
        })
    }

    fn static_file(&self, parts: &[&str]) -> Result<Reply, HandlerError> {
        let mut path = self.site_path(parts);
        if path.is_dir() {
            path.push("index.html");
        }
        if !path.is_file() {
            return Err(HandlerError::not_found());
        }

        // Symlinks must not lead out of the site.
        let root = self
            .root
            .canonicalize()
            .map_err(|e| HandlerError::with_source(500, e))?;
        let resolved = path
            .canonicalize()
            .map_err(|e| HandlerError::with_source(404, e))?;
        if !resolved.starts_with(&root) {
            return Err(HandlerError::not_found());
        }
        Ok(Reply::File(resolved))
    }

    fn site_path(&self, parts: &[&str]) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(parts);
        path
    }
}
