//! Source tree to static site.
//!
//! The [`Transformer`] walks a [`SourceProvider`](crate::source::SourceProvider),
//! renders manuals, copies assets and display names, and expands device
//! repositories named by `details.json` manifests, all into one
//! [`BuildSession`](crate::output::BuildSession).

pub mod image;
pub mod manifest;
pub mod markdown;
pub mod template;
mod transform;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::source::MappingError;
use crate::source::git::CloneError;
use image::ImageError;

pub use transform::{BuildOptions, BuildStats, Transformer};

/// Errors that abort a build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to access `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Clone(#[from] CloneError),

    #[error("invalid manifest `{}`", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no template.html found for `{}`", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("template `{}`: {message}", path.display())]
    Template { path: PathBuf, message: String },

    #[error("failed to inline image `{reference}` in `{}`", page.display())]
    Image {
        page: PathBuf,
        reference: String,
        #[source]
        source: ImageError,
    },

    #[error("more than one source maps to `{}`", .0.display())]
    Collision(PathBuf),
}
