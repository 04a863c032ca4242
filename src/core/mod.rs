//! Core types - names and states shared across the codebase.

mod category;
mod state;

pub use category::EntryKind;
pub use state::{is_shutdown, register_server, setup_shutdown_handler};

/// Campaign inserted when a request names no campaign.
pub const GENERIC_CAMPAIGN: &str = "generic";

/// Campaign slot of manufacturer-authored manuals.
pub const MANUFACTURER_CAMPAIGN: &str = "manufacturer";

/// Top-level directory of campaign manuals.
pub const CAMPAIGNS: &str = "campaigns";

/// Top-level directories whose entities carry display names.
pub const NAMESPACES: [&str; 3] = ["devices", "energy_queries", "cloud_feeds"];

/// Manifest naming a device's firmware repository.
pub const MANIFEST_FILE: &str = "details.json";

/// Per-entity display names, copied and served verbatim.
pub const DISPLAY_NAMES_FILE: &str = "display_names.json";

/// Page template searched from a manual upward.
pub const TEMPLATE_FILE: &str = "template.html";

/// Directory copied without transformation.
pub const ASSETS_DIR: &str = "assets";

/// Directory holding `<lang>.md` files; dropped from output paths.
pub const LANGUAGES_DIR: &str = "languages";

/// Title used when a manual does not start with a `# ` heading.
pub const FALLBACK_TITLE: &str = "Twomes manual";
