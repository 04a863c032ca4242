//! `[source]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [source]
//! location = "https://github.com/org/manuals"   # or a local directory
//! branch = "main"                               # git sources only
//! ```

use serde::{Deserialize, Serialize};

/// Manual source settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceSectionConfig {
    /// Local directory, or a git URL when it starts with `https://`.
    pub location: String,

    /// Branch to clone; the remote's default branch when unset.
    pub branch: Option<String>,
}

impl SourceSectionConfig {
    pub fn is_repository(&self) -> bool {
        self.location.starts_with("https://")
    }
}

impl Default for SourceSectionConfig {
    fn default() -> Self {
        Self {
            location: "./source".to_string(),
            branch: None,
        }
    }
}
