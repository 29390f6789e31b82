//! Site registry: which listing pages to scrape and how to read them.
//!
//! The built-in table covers the default outlets. A YAML file with the same
//! fields replaces it entirely, so new sites are added by data entry alone:
//!
//! ```yaml
//! - name: Example News
//!   url: https://example.com/world
//!   tag: h3
//!   class_name: story-title
//!   link_tag: a
//!   link_class: story-link
//!   base_url: https://example.com
//!   site_url: https://example.com
//!   link_scope: self_only   # optional, defaults to self_then_parent
//! ```
//!
//! Selectors are tied to each outlet's markup and stop matching silently when
//! that markup changes.

use crate::error::ConfigError;
use crate::models::{LinkScope, SiteDescriptor};
use once_cell::sync::Lazy;
use tracing::{info, instrument};

/// `(name, url, tag, class_name, link_tag, link_class, base_url, site_url)`
type SiteRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

const BUILTIN_ROWS: &[SiteRow] = &[
    (
        "Al Jazeera",
        "https://www.aljazeera.com/news/",
        "h3",
        "gc__title",
        "a",
        "gc__title",
        "https://www.aljazeera.com",
        "https://www.aljazeera.com",
    ),
    (
        "BBC",
        "https://www.bbc.com/news",
        "h3",
        "gs-c-promo-heading__title",
        "a",
        "gs-c-promo-heading",
        "https://www.bbc.com",
        "https://www.bbc.com",
    ),
    (
        "Reuters",
        "https://www.reuters.com/world/",
        "h3",
        "story-title",
        "a",
        "story-title",
        "https://www.reuters.com",
        "https://www.reuters.com",
    ),
    (
        "CNN",
        "https://edition.cnn.com/world",
        "span",
        "cd__headline-text",
        "a",
        "container__link",
        "https://edition.cnn.com",
        "https://edition.cnn.com",
    ),
    (
        "NY Times",
        "https://www.nytimes.com/section/world",
        "h2",
        "css-1j9dxys e1xfvim30",
        "a",
        "css-1wjnrbv",
        "https://www.nytimes.com",
        "https://www.nytimes.com",
    ),
    (
        "The Guardian",
        "https://www.theguardian.com/world",
        "div",
        "fc-item__content",
        "a",
        "u-faux-block-link__overlay js-headline-text",
        "https://www.theguardian.com",
        "https://www.theguardian.com",
    ),
    (
        "Fox News",
        "https://www.foxnews.com/world",
        "h2",
        "title",
        "a",
        "title",
        "https://www.foxnews.com",
        "https://www.foxnews.com",
    ),
];

static BUILTIN_SITES: Lazy<Vec<SiteDescriptor>> = Lazy::new(|| {
    BUILTIN_ROWS
        .iter()
        .map(
            |&(name, url, tag, class_name, link_tag, link_class, base_url, site_url)| SiteDescriptor {
                name: name.to_string(),
                url: url.to_string(),
                tag: tag.to_string(),
                class_name: class_name.to_string(),
                link_tag: link_tag.to_string(),
                link_class: link_class.to_string(),
                base_url: base_url.to_string(),
                site_url: site_url.to_string(),
                link_scope: LinkScope::SelfThenParent,
            },
        )
        .collect()
});

/// The built-in registry, in scrape order.
pub fn builtin() -> &'static [SiteDescriptor] {
    &BUILTIN_SITES
}

/// Parse a registry from YAML text. `origin` names the source in errors.
pub fn parse_sites(yaml: &str, origin: &str) -> Result<Vec<SiteDescriptor>, ConfigError> {
    let sites: Vec<SiteDescriptor> = serde_yaml::from_str(yaml).map_err(|source| ConfigError::Yaml {
        path: origin.to_string(),
        source,
    })?;
    if sites.is_empty() {
        return Err(ConfigError::Empty {
            path: origin.to_string(),
        });
    }
    Ok(sites)
}

/// Load the registry from `path`, or fall back to [`builtin`].
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, is not a valid
/// YAML list of sites, or lists no sites at all.
#[instrument(level = "info")]
pub async fn load_sites(path: Option<&str>) -> Result<Vec<SiteDescriptor>, ConfigError> {
    let Some(path) = path else {
        info!(count = BUILTIN_SITES.len(), "Using built-in site registry");
        return Ok(builtin().to_vec());
    };

    let yaml = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
    let sites = parse_sites(&yaml, path)?;
    info!(count = sites.len(), %path, "Loaded site registry");
    Ok(sites)
}
