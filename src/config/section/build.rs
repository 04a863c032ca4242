//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "./parsed"
//! ignore = ["README.md", "LICENSE.md"]
//! image_timeout_secs = 30
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::compiler::BuildOptions;

/// Build settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Directory the site is published to.
    pub output: PathBuf,

    /// File names skipped anywhere in the source tree.
    pub ignore: Vec<String>,

    /// Timeout for fetching a remote image, in seconds.
    pub image_timeout_secs: u64,
}

impl BuildSectionConfig {
    pub fn options(&self) -> BuildOptions {
        BuildOptions {
            ignore: self.ignore.clone(),
            image_timeout: Duration::from_secs(self.image_timeout_secs),
        }
    }
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("./parsed"),
            ignore: ["README.md", "readme.md", "LICENSE.md", "license.md"]
                .map(String::from)
                .to_vec(),
            image_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_build_config() {
        let config = test_parse_config(
            "[build]\noutput = \"site\"\nignore = [\"NOTES.md\"]\nimage_timeout_secs = 5",
        );
        assert_eq!(config.build.output, PathBuf::from("site"));
        assert_eq!(config.build.ignore, vec!["NOTES.md"]);
        assert_eq!(config.build.options().image_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_build_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.output, PathBuf::from("./parsed"));
        assert_eq!(config.build.ignore.len(), 4);
        assert!(config.build.ignore.contains(&"readme.md".to_string()));
        assert_eq!(config.build.image_timeout_secs, 30);
    }
}
