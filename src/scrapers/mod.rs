//! Listing page scraping.
//!
//! Every site goes through the same two steps, driven by its
//! [`SiteDescriptor`](crate::models::SiteDescriptor):
//!
//! 1. **Fetching** ([`fetch`]): download the listing page with a browser user
//!    agent and a fixed timeout
//! 2. **Extracting** ([`extract`]): pull headline text and links out of the
//!    markup using the site's tag and class selectors
//!
//! There is no per-site code; adding an outlet is a registry entry.

pub mod extract;
pub mod fetch;

pub use extract::extract_headlines;
pub use fetch::{Fetch, HttpFetcher};
