//! Configuration section definitions.
//!
//! Each module corresponds to a section in `manuals.toml`:
//!
//! | Module   | TOML Section | Purpose                                  |
//! |----------|--------------|------------------------------------------|
//! | `source` | `[source]`   | Where manuals come from                  |
//! | `build`  | `[build]`    | Output directory, ignore list, timeouts  |
//! | `serve`  | `[serve]`    | HTTP server and fallback language        |

mod build;
mod serve;
mod source;

pub use build::BuildSectionConfig;
pub use serve::ServeConfig;
pub use source::SourceSectionConfig;
