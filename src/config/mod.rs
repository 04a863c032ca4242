//! Configuration management for `manuals.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── serve      # [serve]
//! │   └── source     # [source]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError
//! │   └── handle     # Global config handle
//! └── mod.rs         # ManualConfig (this file)
//! ```
//!
//! # Precedence
//!
//! Every setting is resolved as: defaults < `manuals.toml` < environment
//! (`NFH_MANUAL_SOURCE`, `NFH_MANUAL_SOURCE_BRANCH`, `NFH_FALLBACK_LANG`)
//! < command-line flags. The config file is optional.

pub mod section;
pub mod types;
mod util;

use util::{find_config_file, resolve_against};

pub use section::{BuildSectionConfig, ServeConfig, SourceSectionConfig};
pub use types::{ConfigError, cfg, init_config};

use crate::{
    cli::{Cli, Commands},
    language::LanguageTag,
    log,
    source::SourceLocation,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Environment variable naming the manual source.
pub const ENV_SOURCE: &str = "NFH_MANUAL_SOURCE";
/// Environment variable naming the branch of a git source.
pub const ENV_SOURCE_BRANCH: &str = "NFH_MANUAL_SOURCE_BRANCH";
/// Environment variable naming the fallback language.
pub const ENV_FALLBACK_LANG: &str = "NFH_FALLBACK_LANG";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing manuals.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManualConfig {
    /// Path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Source settings
    #[serde(default)]
    pub source: SourceSectionConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildSectionConfig,

    /// Server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl ManualConfig {
    /// Load configuration for `cli` from the process environment.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        Self::load_with(cli, &cwd, |key| std::env::var(key).ok())
    }

    /// Load configuration with an explicit working directory and
    /// environment lookup.
    pub fn load_with(
        cli: &Cli,
        cwd: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = match find_config_file(&cli.config, cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.normalize_paths(&root);
                config.config_path = Some(path);
                config
            }
            None => Self::default(),
        };

        config.apply_env(env);
        config.apply_command_options(cli);
        config.validate(cli.is_serve())?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        log!("warning"; "unknown fields in {} are ignored: {}", path.display(), fields.join(", "));
    }

    /// Paths in the file are relative to the file's directory.
    fn normalize_paths(&mut self, root: &Path) {
        self.build.output = resolve_against(root, &self.build.output);
        if !self.source.is_repository() {
            self.source.location = resolve_against(root, Path::new(&self.source.location))
                .to_string_lossy()
                .into_owned();
        }
    }

    // ========================================================================
    // environment and cli overrides
    // ========================================================================

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        let set = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        if let Some(source) = set(ENV_SOURCE) {
            self.source.location = source;
        }
        if let Some(branch) = set(ENV_SOURCE_BRANCH) {
            self.source.branch = Some(branch);
        }
        if let Some(lang) = set(ENV_FALLBACK_LANG) {
            self.serve.fallback_language = Some(lang);
        }
    }

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        let build_args = cli.build_args();
        crate::logger::set_verbose(build_args.verbose);
        Self::update_option(&mut self.source.location, build_args.source.as_ref());
        if build_args.branch.is_some() {
            self.source.branch.clone_from(&build_args.branch);
        }
        Self::update_option(&mut self.build.output, build_args.output.as_ref());

        if let Commands::Serve {
            interface,
            port,
            fallback_lang,
            ..
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            if fallback_lang.is_some() {
                self.serve.fallback_language.clone_from(fallback_lang);
            }
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation and accessors
    // ========================================================================

    fn validate(&self, serving: bool) -> Result<(), ConfigError> {
        if self.source.location.trim().is_empty() {
            return Err(ConfigError::Validation("source location is empty".to_string()));
        }
        if let SourceLocation::Local(dir) = self.source_location()
            && !dir.is_dir()
        {
            return Err(ConfigError::MissingSource(dir));
        }
        if self.build.image_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "[build] image_timeout_secs must be positive".to_string(),
            ));
        }
        if serving {
            if self.serve.port == 0 {
                return Err(ConfigError::Validation("[serve] port must not be 0".to_string()));
            }
            self.fallback_language()?;
        }
        Ok(())
    }

    pub fn source_location(&self) -> SourceLocation {
        SourceLocation::parse(&self.source.location, self.source.branch.as_deref())
    }

    pub fn fallback_language(&self) -> Result<LanguageTag, ConfigError> {
        let raw = self
            .serve
            .fallback_language
            .as_deref()
            .ok_or(ConfigError::MissingFallback)?;
        LanguageTag::parse(raw).map_err(ConfigError::InvalidFallback)
    }
}

#[cfg(test)]
pub fn test_parse_config(extra: &str) -> ManualConfig {
    let (parsed, ignored) = ManualConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
