//! Shared helpers: MIME types, HTML escaping, path handling.

pub mod html;
pub mod mime;
pub mod path;
