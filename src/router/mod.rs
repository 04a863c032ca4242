//! Request routing over the built site.
//!
//! Paths are classified by shape alone ([`Route::classify`]); the
//! [`Router`] then redirects, negotiates a language or serves a file.
//!
//! | Path shape                                  | Route            |
//! |---------------------------------------------|------------------|
//! | `/campaigns/{type}/`                        | `CampaignGeneric`|
//! | `/campaigns/{campaign}/{type}/`             | `Language`       |
//! | `/campaigns/{campaign}/{type}/*`            | `Static`         |
//! | `/{ns}/{entity}/`                           | `DisplayNames`   |
//! | `/{ns}/{entity}/{type}/`                    | `EntityGeneric`  |
//! | `/{ns}/{entity}/{type}/{campaign}/`         | `EntityLanguage` |
//! | `/{ns}/{entity}/{type}/{campaign}/*`        | `Static`         |
//!
//! `{ns}` is one of `devices`, `energy_queries`, `cloud_feeds`.

mod handler;

pub use handler::{HandlerError, Reply, Router, status_text};

use crate::core::{CAMPAIGNS, NAMESPACES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Insert the `generic` campaign before the manual type
    CampaignGeneric,
    /// Negotiate a language for a campaign manual
    Language,
    /// Serve `display_names.json` of an entity
    DisplayNames,
    /// Append the `generic` campaign
    EntityGeneric,
    /// Negotiate a language, falling back to the manufacturer manual
    EntityLanguage,
    /// Serve a file of the built site
    Static,
    NotFound,
}

impl Route {
    /// Classify cleaned path segments. `is_dir` is whether the request path
    /// ends in `/`; only static routes match file-style paths.
    pub fn classify(segments: &[&str], is_dir: bool) -> Self {
        let Some(&first) = segments.first() else {
            return Self::NotFound;
        };

        let route = if first == CAMPAIGNS {
            match segments.len() {
                1 => Self::NotFound,
                2 => Self::CampaignGeneric,
                3 => Self::Language,
                _ => Self::Static,
            }
        } else if NAMESPACES.contains(&first) {
            match segments.len() {
                1 => Self::NotFound,
                2 => Self::DisplayNames,
                3 => Self::EntityGeneric,
                4 => Self::EntityLanguage,
                _ => Self::Static,
            }
        } else {
            Self::NotFound
        };

        match route {
            Self::Static | Self::NotFound => route,
            _ if is_dir => route,
            _ => Self::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(path: &str) -> Route {
        let segments = crate::utils::path::route::segments(path);
        Route::classify(&segments, path.ends_with('/'))
    }

    #[test]
    fn test_campaign_shapes() {
        assert_eq!(classify("/campaigns/installation/"), Route::CampaignGeneric);
        assert_eq!(classify("/campaigns/generic/installation/"), Route::Language);
        assert_eq!(classify("/campaigns/generic/installation/en-US/"), Route::Static);
        assert_eq!(
            classify("/campaigns/generic/installation/assets/a.png"),
            Route::Static
        );
        assert_eq!(classify("/campaigns/"), Route::NotFound);
    }

    #[test]
    fn test_namespace_shapes() {
        for ns in NAMESPACES {
            assert_eq!(classify(&format!("/{ns}/X/")), Route::DisplayNames);
            assert_eq!(classify(&format!("/{ns}/X/installation/")), Route::EntityGeneric);
            assert_eq!(
                classify(&format!("/{ns}/X/installation/demo/")),
                Route::EntityLanguage
            );
            assert_eq!(
                classify(&format!("/{ns}/X/installation/demo/en-US/")),
                Route::Static
            );
            assert_eq!(classify(&format!("/{ns}/")), Route::NotFound);
        }
    }

    #[test]
    fn test_unknown_and_file_shapes() {
        assert_eq!(classify("/"), Route::NotFound);
        assert_eq!(classify("/other/x/"), Route::NotFound);
        assert_eq!(classify("/devices/X/installation/demo"), Route::NotFound);
        assert_eq!(classify("/devices/X"), Route::NotFound);
    }
}
