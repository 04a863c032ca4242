//! `[serve]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "0.0.0.0"       # Network interface (0.0.0.0 = all interfaces)
//! port = 8080                 # HTTP port number
//! fallback_language = "nl-NL" # Served when no requested language exists
//! ```
//!
//! Use `interface = "127.0.0.1"` to keep the server local.

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

/// Manual server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Language tag preferred when `Accept-Language` does not decide.
    /// Required for `serve`.
    pub fallback_language: Option<String>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            fallback_language: None,
        }
    }
}
