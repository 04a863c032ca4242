//! Global config handle.
//!
//! Uses `arc-swap` for lock-free reads from request handler threads.

use crate::config::ManualConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<ManualConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(ManualConfig::default()));

#[inline]
pub fn cfg() -> Arc<ManualConfig> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: ManualConfig) -> Arc<ManualConfig> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}
