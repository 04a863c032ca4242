//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`clean_relative`)
//! - [`route`]: URL path cleaning and segment handling

pub mod fs;
pub mod route;

pub use fs::clean_relative;
