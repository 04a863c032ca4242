//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro that only prints with `--verbose`
//!
//! # Example
//!
//! ```ignore
//! log!("build"; "rendered {} pages", count);
//! debug!("route"; "{} -> {}", from, to);
//! ```

use owo_colors::{OwoColorize, Stream};
use std::{
    io::{Write, stderr, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix.
///
/// Errors and warnings go to stderr, everything else to stdout.
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();

    if is_error_module(&module_lower) {
        let prefix = colorize_prefix(module, &module_lower, Stream::Stderr);
        let mut err = stderr().lock();
        writeln!(err, "{prefix} {message}").ok();
        err.flush().ok();
    } else {
        let prefix = colorize_prefix(module, &module_lower, Stream::Stdout);
        let mut out = stdout().lock();
        writeln!(out, "{prefix} {message}").ok();
        out.flush().ok();
    }
}

fn is_error_module(module_lower: &str) -> bool {
    matches!(module_lower, "error" | "warning")
}

/// Apply color to a module prefix based on module type.
///
/// Colors are only emitted when `stream` supports them or `--color always`
/// forced them on.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str, stream: Stream) -> String {
    let prefix = format!("[{module}]");
    let colored = match module_lower {
        "serve" => prefix.if_supports_color(stream, |p| p.bright_blue().bold().to_string()).to_string(),
        "build" => prefix.if_supports_color(stream, |p| p.bright_green().bold().to_string()).to_string(),
        "git" => prefix.if_supports_color(stream, |p| p.bright_magenta().bold().to_string()).to_string(),
        "error" => prefix.if_supports_color(stream, |p| p.bright_red().bold().to_string()).to_string(),
        _ => prefix.if_supports_color(stream, |p| p.bright_yellow().bold().to_string()).to_string(),
    };
    colored
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_contains_module_name() {
        owo_colors::set_override(false);
        assert_eq!(colorize_prefix("serve", "serve", Stream::Stdout), "[serve]");
        assert_eq!(colorize_prefix("Build", "build", Stream::Stdout), "[Build]");
        assert_eq!(colorize_prefix("error", "error", Stream::Stderr), "[error]");
        owo_colors::unset_override();
    }

    #[test]
    fn test_error_modules_go_to_stderr() {
        assert!(is_error_module("error"));
        assert!(is_error_module("warning"));
        assert!(!is_error_module("build"));
        assert!(!is_error_module("serve"));
    }
}
