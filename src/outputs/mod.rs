//! Output writers for a finished scrape.
//!
//! # Submodules
//!
//! - [`xlsx`]: styled spreadsheet, one row per headline
//! - [`json`]: machine-readable digest of the same headlines
//!
//! Both refuse an empty headline set without creating a file.

pub mod json;
pub mod xlsx;
