//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::language::LanguageError;

/// Configuration-related errors, all fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("no fallback language set; use --fallback-lang, NFH_FALLBACK_LANG or [serve] fallback_language")]
    MissingFallback,

    #[error("invalid fallback language")]
    InvalidFallback(#[source] LanguageError),

    #[error("source directory `{}` does not exist", .0.display())]
    MissingSource(PathBuf),

    #[error("Config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("manuals.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("manuals.toml"));

        let validation_err = ConfigError::Validation("port must not be 0".to_string());
        assert!(format!("{validation_err}").contains("port must not be 0"));

        assert!(ConfigError::MissingFallback.to_string().contains("NFH_FALLBACK_LANG"));
    }
}
